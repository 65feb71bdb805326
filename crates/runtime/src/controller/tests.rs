use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use tokio::time::Instant;

use super::*;
use crate::completion::Completion;
use crate::descriptor::{ActivityFlag, ActivityWatch, DelegateError};

/// Delegate that finishes by itself after `run_for`, if set.
#[derive(Default)]
struct FakeWork {
	flag: ActivityFlag,
	run_for: Option<Duration>,
	push: bool,
	fail_start: bool,
	fail_stop: bool,
	start_delay: Option<Duration>,
	starts: AtomicUsize,
	stops: AtomicUsize,
}

impl FakeWork {
	fn finishing_after(ms: u64) -> Self {
		Self {
			run_for: Some(Duration::from_millis(ms)),
			push: true,
			..Self::default()
		}
	}

	fn endless() -> Self {
		Self {
			push: true,
			..Self::default()
		}
	}

	fn starts(&self) -> usize {
		self.starts.load(Ordering::SeqCst)
	}

	fn stops(&self) -> usize {
		self.stops.load(Ordering::SeqCst)
	}
}

impl Descriptor for FakeWork {
	fn is_active(&self) -> bool {
		self.flag.is_active()
	}

	fn start(&self) -> std::result::Result<(), DelegateError> {
		if self.fail_start {
			return Err("tracker unreachable".into());
		}
		if let Some(delay) = self.start_delay {
			std::thread::sleep(delay);
		}
		self.starts.fetch_add(1, Ordering::SeqCst);
		self.flag.set_active(true);
		if let Some(run_for) = self.run_for {
			let flag = self.flag.clone();
			tokio::spawn(async move {
				tokio::time::sleep(run_for).await;
				flag.set_active(false);
			});
		}
		Ok(())
	}

	fn stop(&self) -> std::result::Result<(), DelegateError> {
		self.stops.fetch_add(1, Ordering::SeqCst);
		self.flag.set_active(false);
		if self.fail_stop {
			return Err("storage unplugged".into());
		}
		Ok(())
	}

	fn activity(&self) -> Option<ActivityWatch> {
		self.push.then(|| self.flag.subscribe())
	}
}

/// Session whose snapshot is the elapsed time since creation.
struct Clock {
	origin: Instant,
	reads: AtomicU64,
}

impl Clock {
	fn new() -> Self {
		Self {
			origin: Instant::now(),
			reads: AtomicU64::new(0),
		}
	}
}

impl Session for Clock {
	type State = Duration;

	fn state(&self) -> Duration {
		self.reads.fetch_add(1, Ordering::SeqCst);
		self.origin.elapsed()
	}
}

/// Elapsed milliseconds of every snapshot the listener received.
type Recorded = Arc<parking_lot::Mutex<Vec<u64>>>;

fn recorder() -> (Recorded, impl Fn(Duration) + Send + Sync + 'static) {
	let seen: Recorded = Arc::default();
	let sink = Arc::clone(&seen);
	(seen, move |elapsed: Duration| sink.lock().push(elapsed.as_millis() as u64))
}

fn runtime(work: FakeWork) -> SessionRuntime<FakeWork, Clock> {
	SessionRuntime::new(work, Clock::new()).unwrap()
}

fn ms(value: u64) -> Duration {
	Duration::from_millis(value)
}

#[tokio::test(start_paused = true)]
async fn natural_completion_delivers_periodic_then_one_final_snapshot() {
	let runtime = runtime(FakeWork::finishing_after(3500));
	let (seen, listener) = recorder();

	let handle = runtime.start_async_with_listener(listener, ms(1000)).unwrap();
	assert!(matches!(handle.wait().await, Ok(Completion::Finished)));

	assert_eq!(*seen.lock(), vec![1000, 2000, 3000, 3500]);
	assert_eq!(runtime.descriptor().stops(), 0);

	tokio::time::sleep(Duration::from_secs(10)).await;
	assert_eq!(seen.lock().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn start_without_listener_resolves_on_completion() {
	let runtime = runtime(FakeWork::finishing_after(1200));

	let handle = runtime.start_async().unwrap();
	assert!(runtime.is_running());
	assert!(matches!(handle.await, Ok(Completion::Finished)));
	assert!(!runtime.is_running());
	assert_eq!(runtime.session().reads.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn polling_detects_completion_within_one_interval() {
	let work = FakeWork {
		push: false,
		..FakeWork::finishing_after(2500)
	};
	let runtime = SessionRuntime::<FakeWork, Clock>::builder(work, Clock::new())
		.config(RuntimeConfig::default().with_poll_interval(ms(1000)))
		.build()
		.unwrap();
	let (seen, listener) = recorder();

	let handle = runtime.start_async_with_listener(listener, ms(700)).unwrap();
	assert!(matches!(handle.wait().await, Ok(Completion::Finished)));

	let seen = seen.lock();
	assert_eq!(seen.last(), Some(&3000));
	assert_eq!(&seen[..seen.len() - 1], &[700, 1400, 2100, 2800]);
}

#[tokio::test(start_paused = true)]
async fn start_while_active_fails_without_side_effects() {
	let runtime = runtime(FakeWork::endless());
	runtime.descriptor().flag.set_active(true);
	let (seen, listener) = recorder();

	let err = runtime.start_async_with_listener(listener, ms(100)).unwrap_err();
	assert!(err.is_already_running());
	assert!(runtime.start_async().unwrap_err().is_already_running());

	tokio::time::sleep(ms(1000)).await;
	assert_eq!(runtime.descriptor().starts(), 0);
	assert!(seen.lock().is_empty());
	assert!(runtime.completion().is_none());
}

#[tokio::test(start_paused = true)]
async fn start_is_refused_until_previous_run_resolves() {
	let runtime = runtime(FakeWork::endless());
	let first = runtime.start_async().unwrap();

	runtime.descriptor().flag.set_active(false);
	assert!(runtime.start_async().unwrap_err().is_already_running());

	assert!(matches!(first.await, Ok(Completion::Finished)));
	let second = runtime.start_async().unwrap();
	assert!(!second.is_resolved());
	assert_eq!(runtime.descriptor().starts(), 2);

	runtime.stop().unwrap();
	assert!(matches!(second.await, Ok(Completion::Stopped)));
}

#[tokio::test(start_paused = true)]
async fn stop_before_start_is_harmless() {
	let runtime = runtime(FakeWork::finishing_after(500));

	runtime.stop().unwrap();
	runtime.stop().unwrap();
	assert!(runtime.completion().is_none());

	let handle = runtime.start_async().unwrap();
	assert!(matches!(handle.await, Ok(Completion::Finished)));
}

#[tokio::test(start_paused = true)]
async fn stop_cancels_sampler_and_delivers_final_snapshot_first() {
	let runtime = runtime(FakeWork::endless());
	let (seen, listener) = recorder();

	let handle = runtime.start_async_with_listener(listener, ms(1000)).unwrap();
	tokio::time::sleep(ms(2500)).await;
	assert_eq!(seen.lock().len(), 2);

	runtime.stop().unwrap();
	assert!(matches!(handle.clone().await, Ok(Completion::Stopped)));
	assert_eq!(*seen.lock(), vec![1000, 2000, 2500]);

	tokio::time::sleep(Duration::from_secs(10)).await;
	assert_eq!(seen.lock().len(), 3);
	assert_eq!(runtime.descriptor().stops(), 1);
}

#[tokio::test(start_paused = true)]
async fn repeated_stop_is_idempotent() {
	let runtime = runtime(FakeWork::endless());
	let (seen, listener) = recorder();

	let handle = runtime.start_async_with_listener(listener, ms(1000)).unwrap();
	runtime.stop().unwrap();
	assert!(matches!(handle.wait().await, Ok(Completion::Stopped)));

	runtime.stop().unwrap();
	tokio::time::sleep(ms(5000)).await;

	assert!(matches!(handle.outcome(), Some(Ok(Completion::Stopped))));
	assert_eq!(seen.lock().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn stop_failure_is_reported_but_run_still_completes() {
	let runtime = runtime(FakeWork {
		fail_stop: true,
		..FakeWork::endless()
	});
	let handle = runtime.start_async().unwrap();

	let err = runtime.stop().unwrap_err();
	assert!(matches!(err, Error::DelegateStop(_)));
	assert!(err.to_string().contains("storage unplugged"));
	assert!(matches!(handle.await, Ok(Completion::Stopped)));
}

#[tokio::test(start_paused = true)]
async fn failed_start_creates_no_run() {
	let runtime = runtime(FakeWork {
		fail_start: true,
		..FakeWork::endless()
	});
	let (seen, listener) = recorder();

	let err = runtime.start_async_with_listener(listener, ms(100)).unwrap_err();
	assert!(err.is_delegate_failure());
	assert!(runtime.completion().is_none());

	tokio::time::sleep(ms(1000)).await;
	assert!(seen.lock().is_empty());
}

#[tokio::test(start_paused = true)]
async fn zero_period_is_rejected_before_starting() {
	let runtime = runtime(FakeWork::endless());
	let err = runtime.start_async_with_listener(|_| {}, Duration::ZERO).unwrap_err();
	assert!(matches!(err, Error::InvalidPeriod));
	assert_eq!(runtime.descriptor().starts(), 0);
}

#[tokio::test(start_paused = true)]
async fn unschedulable_period_never_samples() {
	let runtime = runtime(FakeWork::endless());
	let (seen, listener) = recorder();

	let handle = runtime.start_async_with_listener(listener, Duration::MAX).unwrap();
	assert_eq!(runtime.descriptor().starts(), 1);

	tokio::time::sleep(Duration::from_secs(3600)).await;
	assert!(seen.lock().is_empty());

	runtime.stop().unwrap();
	assert!(matches!(handle.await, Ok(Completion::Stopped)));
	assert_eq!(*seen.lock(), vec![3_600_000]);
	assert!(runtime.start_async().is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn stop_during_slow_start_stops_the_started_delegate() {
	let work = FakeWork {
		push: false,
		start_delay: Some(ms(200)),
		..FakeWork::endless()
	};
	let runtime = Arc::new(
		SessionRuntime::<FakeWork, Clock>::builder(work, Clock::new())
			.config(RuntimeConfig::default().with_poll_interval(Duration::from_secs(60)))
			.build()
			.unwrap(),
	);

	let starting = tokio::task::spawn_blocking({
		let runtime = Arc::clone(&runtime);
		move || runtime.start_async()
	});
	tokio::time::sleep(ms(50)).await;
	let stopping = tokio::task::spawn_blocking({
		let runtime = Arc::clone(&runtime);
		move || runtime.stop()
	});

	let handle = starting.await.unwrap().unwrap();
	stopping.await.unwrap().unwrap();

	// The stop lands after the start, so the run ends with the delegate stopped.
	assert!(matches!(handle.await, Ok(Completion::Stopped | Completion::Finished)));
	assert!(!runtime.descriptor().is_active());
	assert_eq!(runtime.descriptor().starts(), 1);
	assert_eq!(runtime.descriptor().stops(), 1);
}

#[tokio::test(start_paused = true)]
async fn deadline_stops_the_delegate() {
	let runtime = SessionRuntime::<FakeWork, Clock>::builder(FakeWork::endless(), Clock::new())
		.config(RuntimeConfig::default().with_deadline(Some(ms(1500))))
		.build()
		.unwrap();
	let (seen, listener) = recorder();

	let handle = runtime.start_async_with_listener(listener, ms(1000)).unwrap();
	assert!(matches!(handle.await, Ok(Completion::DeadlineElapsed)));

	assert_eq!(runtime.descriptor().stops(), 1);
	assert!(!runtime.descriptor().is_active());
	assert_eq!(*seen.lock(), vec![1000, 1500]);
}

#[tokio::test(start_paused = true)]
async fn panicking_listener_interrupts_the_run() {
	let runtime = runtime(FakeWork::finishing_after(100));
	let handle = runtime
		.start_async_with_listener(|_| panic!("listener exploded"), ms(1000))
		.unwrap();

	assert!(matches!(handle.await, Err(Error::MonitorInterrupted)));
	assert!(!runtime.is_running());
}

#[tokio::test]
async fn session_is_shared_without_blocking() {
	let runtime = Arc::new(runtime(FakeWork::endless()));
	let _handle = runtime.start_async().unwrap();

	let readers: Vec<_> = (0..8)
		.map(|_| {
			let runtime = Arc::clone(&runtime);
			tokio::spawn(async move { Arc::clone(runtime.session()) })
		})
		.collect();
	for reader in readers {
		assert!(Arc::ptr_eq(&reader.await.unwrap(), runtime.session()));
	}

	runtime.stop().unwrap();
}

#[test]
fn building_outside_a_runtime_needs_an_executor() {
	let err = SessionRuntime::<FakeWork, Clock>::new(FakeWork::endless(), Clock::new())
		.err()
		.unwrap();
	assert!(matches!(err, Error::NoExecutor(_)));

	let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
	let runtime = SessionRuntime::<FakeWork, Clock>::builder(FakeWork::endless(), Clock::new())
		.executor(rt.handle().clone())
		.build();
	assert!(runtime.is_ok());
}

#[test]
fn zero_poll_interval_is_invalid_config() {
	let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
	let result = SessionRuntime::<FakeWork, Clock>::builder(FakeWork::endless(), Clock::new())
		.executor(rt.handle().clone())
		.config(RuntimeConfig::default().with_poll_interval(Duration::ZERO))
		.build();
	assert!(matches!(result, Err(Error::InvalidConfig(_))));
}
