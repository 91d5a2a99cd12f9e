// larder/src/checkout.rs

//! One-call checkout: commit the cart as an order, pay for it, and only then take the ordered lines out of the cart.

use crate::error::{LarderError, Result};
use crate::flow::{Flow, FlowContext, FlowOutcome, StepControl};
use crate::models::{CommittedOrder, PaymentOutcome};
use crate::store::{CartStore, OrderCommitter, PaymentRecorder};
use serde::Serialize;
use tracing::{info, instrument, warn};

pub const COMMIT_ORDER_STEP: &str = "commit_order";
pub const RECORD_PAYMENT_STEP: &str = "record_payment";
pub const CLEAR_CART_STEP: &str = "clear_cart";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
  pub user_id: i64,
  pub delivery_address: String,
  pub payment_method: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutReceipt {
  pub order_id: i64,
  pub total_cents: i64,
  pub payment: PaymentOutcome,
  /// False only when the order is confirmed but removing the ordered lines from the cart failed.
  pub cart_cleared: bool,
}

#[derive(Debug, Clone)]
struct CheckoutState {
  request: CheckoutRequest,
  order: Option<CommittedOrder>,
  payment: Option<PaymentOutcome>,
  cart_cleared: bool,
}

pub struct Checkout {
  flow: Flow<CheckoutState, LarderError>,
}

impl Checkout {
  pub fn new(cart: CartStore, orders: OrderCommitter, payments: PaymentRecorder) -> Self {
    let mut flow = Flow::<CheckoutState, LarderError>::new(
      "checkout",
      &[
        (COMMIT_ORDER_STEP, false),
        (RECORD_PAYMENT_STEP, false),
        (CLEAR_CART_STEP, true),
      ],
    );

    let ordered_items = orders.clone();
    flow.on(COMMIT_ORDER_STEP, move |ctx: FlowContext<CheckoutState>| {
      let orders = orders.clone();
      async move {
        let (user_id, address) = {
          let guard = ctx.read();
          (guard.request.user_id, guard.request.delivery_address.clone())
        };
        let committed = orders.commit(user_id, &address).await?;
        ctx.write().order = Some(committed);
        Ok::<_, LarderError>(StepControl::Continue)
      }
    });

    flow.on(RECORD_PAYMENT_STEP, move |ctx: FlowContext<CheckoutState>| {
      let payments = payments.clone();
      async move {
        let (order, method) = {
          let guard = ctx.read();
          let order = guard
            .order
            .ok_or_else(|| LarderError::Internal("payment step reached without a committed order".into()))?;
          (order, guard.request.payment_method.clone())
        };
        let outcome = payments.record(order.order_id, order.total_cents, &method).await?;
        let completed = outcome.is_completed();
        ctx.write().payment = Some(outcome);

        if completed {
          Ok::<_, LarderError>(StepControl::Continue)
        } else {
          warn!(order_id = order.order_id, "Payment declined; order stays pending and cart is kept.");
          Ok(StepControl::Halt)
        }
      }
    });

    // Only the ordered quantities leave the cart. A failure here must not undo a confirmed
    // order, so it is logged and reported instead.
    flow.on(CLEAR_CART_STEP, move |ctx: FlowContext<CheckoutState>| {
      let cart = cart.clone();
      let orders = ordered_items.clone();
      async move {
        let (user_id, order_id) = {
          let guard = ctx.read();
          (guard.request.user_id, guard.order.map(|o| o.order_id))
        };
        let Some(order_id) = order_id else {
          return Err(LarderError::Internal("cart step reached without a committed order".into()));
        };
        let removed = match orders.get(order_id).await {
          Ok(details) => cart.remove_ordered(user_id, &details.items).await,
          Err(e) => Err(e),
        };
        match removed {
          Ok(_) => ctx.write().cart_cleared = true,
          Err(e) => warn!(error = %e, user_id, order_id, "Order confirmed but the cart could not be cleared."),
        }
        Ok::<_, LarderError>(StepControl::Continue)
      }
    });

    Self { flow }
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.flow.step_names()
  }

  /// Runs the checkout for one user.
  ///
  /// Errors keep their cause: `EmptyCart` and `InvalidArgument` before anything is
  /// written, `PaymentDeclined` once an order exists but was not paid, and
  /// `Persistence` for storage failures.
  #[instrument(name = "checkout::run", skip(self, request), fields(user_id = request.user_id), err(Display))]
  pub async fn run(&self, request: CheckoutRequest) -> Result<CheckoutReceipt> {
    let ctx = FlowContext::new(CheckoutState {
      request,
      order: None,
      payment: None,
      cart_cleared: false,
    });

    let outcome = self.flow.run(ctx.clone()).await?;
    let state = ctx.snapshot();
    let order = state
      .order
      .ok_or_else(|| LarderError::Internal("checkout finished without an order".into()))?;
    let payment = state
      .payment
      .ok_or_else(|| LarderError::Internal("checkout finished without a payment".into()))?;

    match outcome {
      FlowOutcome::Completed => {
        info!(order_id = order.order_id, payment_id = payment.payment_id, "Checkout completed.");
        Ok(CheckoutReceipt {
          order_id: order.order_id,
          total_cents: order.total_cents,
          payment,
          cart_cleared: state.cart_cleared,
        })
      }
      FlowOutcome::Halted => Err(LarderError::PaymentDeclined {
        order_id: order.order_id,
        payment_id: payment.payment_id,
      }),
    }
  }
}
