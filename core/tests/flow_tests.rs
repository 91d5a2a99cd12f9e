// tests/flow_tests.rs
mod common;

use common::setup_tracing;
use larder::flow::{Flow, FlowContext, FlowError, FlowOutcome, StepControl};
use std::future::Future;
use std::pin::Pin;

type StepFuture = Pin<Box<dyn Future<Output = Result<StepControl, TestError>> + Send>>;

#[derive(Debug, thiserror::Error)]
enum TestError {
  #[error("flow: {0}")]
  Flow(#[from] FlowError),
  #[error("handler failed: {0}")]
  Handler(String),
}

#[derive(Debug, Clone, Default)]
struct Trace {
  visited: Vec<String>,
}

fn recorder(label: &'static str) -> impl Fn(FlowContext<Trace>) -> StepFuture + Send + Sync + 'static {
  move |ctx: FlowContext<Trace>| -> StepFuture {
    Box::pin(async move {
      ctx.write().visited.push(label.to_string());
      Ok::<_, TestError>(StepControl::Continue)
    })
  }
}

fn visited(ctx: &FlowContext<Trace>) -> Vec<String> {
  ctx.read().visited.clone()
}

#[tokio::test]
async fn steps_run_in_declaration_order() {
  setup_tracing();
  let mut flow = Flow::<Trace, TestError>::new("ordered", &[("a", false), ("b", false), ("c", false)]);
  flow.on("c", recorder("c"));
  flow.on("a", recorder("a"));
  flow.on("b", recorder("b"));

  let ctx = FlowContext::new(Trace::default());
  assert_eq!(flow.run(ctx.clone()).await.unwrap(), FlowOutcome::Completed);
  assert_eq!(visited(&ctx), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn halt_skips_everything_after_it() {
  setup_tracing();
  let mut flow = Flow::<Trace, TestError>::new("halting", &[("first", false), ("gate", false), ("last", false)]);
  flow.on("first", recorder("first"));
  flow.on("gate", |ctx: FlowContext<Trace>| async move {
    ctx.write().visited.push("gate".into());
    Ok::<_, TestError>(StepControl::Halt)
  });
  flow.after("gate", recorder("gate.after"));
  flow.on("last", recorder("last"));

  let ctx = FlowContext::new(Trace::default());
  assert_eq!(flow.run(ctx.clone()).await.unwrap(), FlowOutcome::Halted);
  assert_eq!(visited(&ctx), vec!["first", "gate"]);
}

#[tokio::test]
async fn handler_errors_stop_the_run_and_surface_unchanged() {
  setup_tracing();
  let mut flow = Flow::<Trace, TestError>::new("failing", &[("ok", false), ("bad", false), ("never", false)]);
  flow.on("ok", recorder("ok"));
  flow.on("bad", |_ctx: FlowContext<Trace>| async move {
    Err::<StepControl, _>(TestError::Handler("out of stock".into()))
  });
  flow.on("never", recorder("never"));

  let ctx = FlowContext::new(Trace::default());
  match flow.run(ctx.clone()).await {
    Err(TestError::Handler(msg)) => assert_eq!(msg, "out of stock"),
    other => panic!("expected handler error, got {:?}", other),
  }
  assert_eq!(visited(&ctx), vec!["ok"]);
}

#[tokio::test]
async fn required_step_without_handlers_is_an_error() {
  setup_tracing();
  let mut flow = Flow::<Trace, TestError>::new("incomplete", &[("wired", false), ("unwired", false)]);
  flow.on("wired", recorder("wired"));

  let ctx = FlowContext::new(Trace::default());
  match flow.run(ctx.clone()).await {
    Err(TestError::Flow(FlowError::HandlerMissing { step_name })) => assert_eq!(step_name, "unwired"),
    other => panic!("expected HandlerMissing, got {:?}", other),
  }
  assert_eq!(visited(&ctx), vec!["wired"]);
}

#[tokio::test]
async fn optional_step_without_handlers_is_skipped() {
  setup_tracing();
  let mut flow = Flow::<Trace, TestError>::new("sparse", &[("a", false), ("maybe", true), ("b", false)]);
  flow.on("a", recorder("a"));
  flow.on("b", recorder("b"));

  let ctx = FlowContext::new(Trace::default());
  assert_eq!(flow.run(ctx.clone()).await.unwrap(), FlowOutcome::Completed);
  assert_eq!(visited(&ctx), vec!["a", "b"]);
}

#[tokio::test]
async fn after_handlers_follow_every_on_handler() {
  setup_tracing();
  let mut flow = Flow::<Trace, TestError>::new("phased", &[("step", false)]);
  flow.after("step", recorder("after"));
  flow.on("step", recorder("on.1"));
  flow.on("step", recorder("on.2"));

  let ctx = FlowContext::new(Trace::default());
  flow.run(ctx.clone()).await.unwrap();
  assert_eq!(visited(&ctx), vec!["on.1", "on.2", "after"]);
}

#[tokio::test]
async fn steps_can_be_inserted_and_toggled() {
  setup_tracing();
  let mut flow = Flow::<Trace, TestError>::new("editable", &[("a", false), ("c", false)]);
  flow.insert_after("a", "b", true).unwrap();
  assert_eq!(flow.step_names(), vec!["a", "b", "c"]);

  assert!(matches!(
    flow.insert_after("missing", "x", false),
    Err(FlowError::StepNotFound { .. })
  ));
  assert!(matches!(flow.set_optional("missing", true), Err(FlowError::StepNotFound { .. })));

  // "b" has no handlers; once required, the run must refuse it.
  flow.on("a", recorder("a"));
  flow.on("c", recorder("c"));
  flow.set_optional("b", false).unwrap();
  let ctx = FlowContext::new(Trace::default());
  assert!(matches!(
    flow.run(ctx).await,
    Err(TestError::Flow(FlowError::HandlerMissing { .. }))
  ));
}

#[tokio::test]
async fn context_snapshot_is_detached() {
  let ctx = FlowContext::new(Trace::default());
  ctx.write().visited.push("one".into());
  let snap = ctx.snapshot();
  ctx.write().visited.push("two".into());
  assert_eq!(snap.visited, vec!["one"]);
  assert_eq!(visited(&ctx).len(), 2);
}
