use pretty_assertions::assert_eq;
use serde_json::json;
use worker_lab_core::*;
use worker_lab_workflow::*;

fn terminals(notifications: &[Notification]) -> Vec<&Notification> {
    notifications.iter().filter(|n| n.is_terminal()).collect()
}

#[tokio::test]
async fn test_worker_reports_primes() {
    let mut worker = Worker::spawn(RunnerConfig::default());
    worker.submit(TaskRequest::calculate(10)).unwrap();

    let terminal = worker.wait_for_terminal(|_| {}).await.unwrap();

    match terminal {
        Notification::Result(TaskOutput::Primes(report)) => {
            assert_eq!(report.primes, vec![2, 3, 5, 7]);
        }
        other => panic!("expected primes, got {:?}", other),
    }
    worker.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_worker_forwards_progress_before_terminal() {
    let mut worker = Worker::spawn(RunnerConfig::default());
    worker.submit(TaskRequest::calculate(3000)).unwrap();

    let mut seen = Vec::new();
    let terminal = worker.wait_for_terminal(|value| seen.push(value)).await;

    assert_eq!(seen, vec![33, 67]);
    assert!(matches!(terminal, Some(Notification::Result(_))));
}

#[tokio::test]
async fn test_worker_reports_csv_statistics() {
    let mut worker = Worker::spawn(RunnerConfig::default());
    worker.submit(TaskRequest::process("a,b\n1,2\n3,x\n")).unwrap();

    match worker.wait_for_terminal(|_| {}).await {
        Some(Notification::Result(TaskOutput::Statistics(summary))) => {
            assert_eq!(summary.count, 3);
            assert_eq!(summary.sum, 6.0);
            assert_eq!(summary.mean, 2.0);
            assert_eq!(summary.min, 1.0);
            assert_eq!(summary.max, 3.0);
        }
        other => panic!("expected statistics, got {:?}", other),
    }
}

#[tokio::test]
async fn test_worker_reports_error_for_empty_csv() {
    let mut worker = Worker::spawn(RunnerConfig::default());
    worker.submit(TaskRequest::process("header\nfoo\n")).unwrap();

    let terminal = worker.wait_for_terminal(|_| {}).await.unwrap();

    assert!(matches!(terminal, Notification::Error { .. }));
}

#[tokio::test]
async fn test_each_submission_yields_exactly_one_terminal() {
    let worker = Worker::spawn(RunnerConfig::default());
    let submissions = vec![
        TaskRequest::calculate(2500),
        TaskRequest::process("a\n1\n2\n"),
        TaskRequest::process(""),
        TaskRequest::calculate(-3),
        TaskRequest::calculate(50),
    ];
    let expected = submissions.len();

    for request in submissions {
        worker.submit(request).unwrap();
    }
    let notifications = worker.finish().await.unwrap();

    assert_eq!(terminals(&notifications).len(), expected);
    assert!(notifications.last().unwrap().is_terminal());
}

#[tokio::test]
async fn test_submissions_complete_in_order() {
    let worker = Worker::spawn(RunnerConfig::default());
    worker.submit(TaskRequest::calculate(20_000)).unwrap();
    worker.submit(TaskRequest::calculate(10)).unwrap();

    let notifications = worker.finish().await.unwrap();
    let results: Vec<usize> = terminals(&notifications)
        .into_iter()
        .map(|n| match n {
            Notification::Result(TaskOutput::Primes(report)) => report.primes.len(),
            other => panic!("unexpected {:?}", other),
        })
        .collect();

    assert_eq!(results, vec![2262, 4]);
}

#[tokio::test]
async fn test_progress_never_follows_its_terminal() {
    let worker = Worker::spawn(RunnerConfig::default());
    worker.submit(TaskRequest::calculate(8000)).unwrap();

    let notifications = worker.finish().await.unwrap();
    let (last, progress) = notifications.split_last().unwrap();

    assert!(last.is_terminal());
    assert!(progress.iter().all(|n| !n.is_terminal()));
    assert_eq!(progress.len(), 7);
}

#[tokio::test]
async fn test_unknown_raw_command_is_silent() {
    let worker = Worker::spawn(RunnerConfig::default());
    worker.post_message(json!({"command": "explode", "max": 10})).unwrap();

    let notifications = worker.finish().await.unwrap();

    assert!(notifications.is_empty());
}

#[tokio::test]
async fn test_malformed_raw_payload_yields_error() {
    let worker = Worker::spawn(RunnerConfig::default());
    worker.post_message(json!({"command": "process", "data": null})).unwrap();

    let notifications = worker.finish().await.unwrap();

    assert_eq!(notifications.len(), 1);
    assert!(matches!(notifications[0], Notification::Error { .. }));
}

#[tokio::test]
async fn test_raw_and_typed_submissions_mix() {
    let worker = Worker::spawn(RunnerConfig::default());
    worker.post_message(json!({"command": "calculate", "max": 10})).unwrap();
    worker.post_message(json!({"command": "noop"})).unwrap();
    worker.submit(TaskRequest::process("x\n5\n")).unwrap();

    let notifications = worker.finish().await.unwrap();

    assert_eq!(terminals(&notifications).len(), 2);
}

#[tokio::test]
async fn test_submit_after_close_fails() {
    let mut worker = Worker::spawn(RunnerConfig::default());
    worker.close();

    assert!(worker.is_closed());
    let err = worker.submit(TaskRequest::calculate(10)).unwrap_err();
    assert!(matches!(err, CoreError::WorkerClosed(_)));
}

#[tokio::test]
async fn test_recv_ends_after_close() {
    let mut worker = Worker::spawn(RunnerConfig::default());
    worker.submit(TaskRequest::calculate(5)).unwrap();
    worker.close();

    assert!(matches!(worker.recv().await, Some(Notification::Result(_))));
    assert!(worker.recv().await.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_independent_workers_run_side_by_side() {
    let first = Worker::spawn(RunnerConfig::default());
    let second = Worker::spawn(RunnerConfig::default());

    first.submit(TaskRequest::calculate(30_000)).unwrap();
    second.submit(TaskRequest::process("a,b\n1,1\n")).unwrap();

    let (a, b) = tokio::join!(first.finish(), second.finish());

    assert_eq!(terminals(&a.unwrap()).len(), 1);
    assert_eq!(terminals(&b.unwrap()).len(), 1);
}

#[tokio::test]
async fn test_custom_config_reaches_tasks() {
    let mut worker = Worker::spawn(RunnerConfig {
        prime_progress_interval: 5,
        csv_progress_interval: 1,
    });
    worker.submit(TaskRequest::calculate(20)).unwrap();

    let mut seen = Vec::new();
    worker.wait_for_terminal(|v| seen.push(v)).await;

    assert_eq!(seen, vec![25, 50, 75]);
}

/// Serves `process` requests with a task that panics halfway through.
struct ExplodingCsv;

struct ExplodingTask;

impl Task for ExplodingTask {
    fn execute(&self, progress: &mut ProgressReporter<'_>) -> Result<TaskOutput> {
        progress.report(50);
        panic!("boom: row parser exploded");
    }

    fn name(&self) -> &str {
        "exploding"
    }
}

impl TaskFactory for ExplodingCsv {
    fn create(&self, request: TaskRequest, config: &RunnerConfig) -> Box<dyn Task> {
        match request {
            TaskRequest::Process { .. } => Box::new(ExplodingTask),
            other => BuiltinTasks.create(other, config),
        }
    }
}

#[tokio::test]
async fn test_panicking_task_yields_one_error_and_worker_survives() {
    let worker = Worker::with_executor(TaskExecutor::with_factory(
        RunnerConfig::default(),
        ExplodingCsv,
    ));
    worker.submit(TaskRequest::process("h\n1\n")).unwrap();
    worker.submit(TaskRequest::calculate(10)).unwrap();

    let notifications = worker.finish().await.unwrap();
    let terminals = terminals(&notifications);

    assert_eq!(terminals.len(), 2);
    match terminals[0] {
        Notification::Error { message } => {
            assert!(message.contains("boom: row parser exploded"), "{}", message);
        }
        other => panic!("expected error, got {:?}", other),
    }
    match terminals[1] {
        Notification::Result(TaskOutput::Primes(report)) => {
            assert_eq!(report.primes, vec![2, 3, 5, 7]);
        }
        other => panic!("expected primes, got {:?}", other),
    }
    assert_eq!(notifications[0], Notification::progress(50));
}

#[tokio::test]
async fn test_panicking_raw_message_yields_one_error() {
    let mut worker = Worker::with_executor(TaskExecutor::with_factory(
        RunnerConfig::default(),
        ExplodingCsv,
    ));
    worker
        .post_message(json!({"command": "process", "data": "h\n1\n"}))
        .unwrap();

    let terminal = worker.wait_for_terminal(|_| {}).await.unwrap();

    assert!(matches!(terminal, Notification::Error { ref message } if message.contains("boom")));
    assert!(worker.finish().await.unwrap().is_empty());
}
