//! Checkout flow.
//!
//! `Collecting -> Confirming -> Submitted`. The only way into `Submitted` is
//! a successful order write; a failed write leaves the flow in `Confirming`
//! so the shopper can try again.

use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicBool, Ordering},
};

use storefront::{
    checkout::{BankDetails, CheckoutState, DeliveryDetails, DeliveryField, MissingFields},
    orders::{IdempotencyKey, NewOrder},
};
use tracing::{Span, debug, error, info};

use crate::{
    domain::{
        carts::CartStore,
        checkout::{
            clear::DeferredClear,
            errors::CheckoutError,
            settings::{CheckoutSettings, ClearPolicy, IdempotencyPolicy},
        },
        orders::OrdersService,
    },
    navigation::{Navigator, Route},
    persistence::RecordId,
};

/// Result of entering checkout.
#[derive(Debug)]
pub enum CheckoutEntry {
    /// The cart has lines; checkout can proceed.
    Ready(CheckoutFlow),

    /// The cart was empty and the shopper was sent back to the cart view.
    RedirectedToCart,
}

/// A successfully written order.
#[derive(Debug)]
pub struct OrderPlaced {
    /// Backend id of the new order.
    pub order_id: RecordId,

    /// What was written.
    pub order: NewOrder,

    /// The pending cart clear. The cart still holds the ordered lines until
    /// this completes.
    pub clear: DeferredClear,
}

#[derive(Debug, Default)]
struct FlowState {
    state: CheckoutState,
    delivery: DeliveryDetails,
}

/// One shopper's pass through checkout.
pub struct CheckoutFlow {
    cart: Arc<CartStore>,
    orders: Arc<dyn OrdersService>,
    navigator: Arc<dyn Navigator>,
    settings: CheckoutSettings,
    inner: Mutex<FlowState>,
    submitting: AtomicBool,
    idempotency_key: Option<IdempotencyKey>,
}

impl std::fmt::Debug for CheckoutFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutFlow")
            .field("inner", &self.inner)
            .field("submitting", &self.submitting)
            .field("idempotency_key", &self.idempotency_key)
            .finish_non_exhaustive()
    }
}

impl CheckoutFlow {
    /// Enter checkout.
    ///
    /// The cart is checked once, here. An empty cart redirects to the cart
    /// view instead of starting a checkout; later changes to the cart are not
    /// watched.
    pub fn enter(
        cart: Arc<CartStore>,
        orders: Arc<dyn OrdersService>,
        navigator: Arc<dyn Navigator>,
        settings: CheckoutSettings,
    ) -> CheckoutEntry {
        if cart.is_empty() {
            debug!("cart is empty, redirecting to cart");

            navigator.navigate(Route::Cart);

            return CheckoutEntry::RedirectedToCart;
        }

        let idempotency_key = match settings.idempotency {
            IdempotencyPolicy::Disabled => None,
            IdempotencyPolicy::ClientToken => Some(IdempotencyKey::generate()),
        };

        CheckoutEntry::Ready(Self {
            cart,
            orders,
            navigator,
            settings,
            inner: Mutex::new(FlowState::default()),
            submitting: AtomicBool::new(false),
            idempotency_key,
        })
    }

    /// Current state.
    pub fn state(&self) -> CheckoutState {
        self.lock().state
    }

    /// Copy of the delivery details entered so far.
    pub fn delivery(&self) -> DeliveryDetails {
        self.lock().delivery.clone()
    }

    /// Update one delivery field.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidState`] once the order is submitted.
    pub fn set_field(
        &self,
        field: DeliveryField,
        value: impl Into<String>,
    ) -> Result<(), CheckoutError> {
        let mut inner = self.lock();

        if inner.state == CheckoutState::Submitted {
            return Err(CheckoutError::InvalidState {
                current: CheckoutState::Submitted,
                expected: CheckoutState::Collecting,
            });
        }

        inner.delivery.set(field, value);

        Ok(())
    }

    /// Required fields that are still empty.
    pub fn missing_fields(&self) -> MissingFields {
        self.lock().delivery.missing_fields()
    }

    /// Whether the "continue to pay" step is available right now.
    pub fn can_continue(&self) -> bool {
        let inner = self.lock();

        inner.state == CheckoutState::Collecting && inner.delivery.is_complete()
    }

    /// Whether a confirmation write is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Payment instructions for the bank transfer.
    pub fn bank_details(&self) -> &BankDetails {
        &self.settings.bank
    }

    /// Key attached to this checkout's order writes, if enabled.
    pub fn idempotency_key(&self) -> Option<IdempotencyKey> {
        self.idempotency_key
    }

    /// Move from `Collecting` to `Confirming` and return the payment
    /// instructions. Calling it again while confirming is harmless.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::IncompleteDetails`]: a required field is empty.
    /// - [`CheckoutError::InvalidState`]: the order is already submitted.
    pub fn continue_to_payment(&self) -> Result<&BankDetails, CheckoutError> {
        let mut inner = self.lock();

        match inner.state {
            CheckoutState::Collecting => {
                let missing = inner.delivery.missing_fields();

                if !missing.is_empty() {
                    return Err(CheckoutError::IncompleteDetails(missing));
                }

                inner.state = CheckoutState::Confirming;

                debug!("showing payment instructions");
            }
            CheckoutState::Confirming => {}
            CheckoutState::Submitted => {
                return Err(CheckoutError::InvalidState {
                    current: CheckoutState::Submitted,
                    expected: CheckoutState::Collecting,
                });
            }
        }

        Ok(&self.settings.bank)
    }

    /// The shopper says they have paid: write the order.
    ///
    /// At most one write is in flight per checkout. A call made while another
    /// is still waiting on the backend returns
    /// [`CheckoutError::AlreadySubmitting`] without writing anything.
    ///
    /// On success the flow is `Submitted`, the shopper is sent to the
    /// thank-you view, and the cart clear is scheduled according to the
    /// [`ClearPolicy`]. On failure the flow stays `Confirming` and the cart is
    /// untouched.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::AlreadySubmitting`]: a write is already in flight.
    /// - [`CheckoutError::InvalidState`]: not in `Confirming`.
    /// - [`CheckoutError::IncompleteDetails`]: a required field was cleared.
    /// - [`CheckoutError::EmptyCart`]: the cart was emptied meanwhile.
    /// - [`CheckoutError::Pricing`]: the total overflowed.
    /// - [`CheckoutError::Persistence`]: the backend write failed.
    #[tracing::instrument(
        name = "checkout.confirm_payment",
        skip(self),
        fields(order_id = tracing::field::Empty),
        err
    )]
    pub async fn confirm_payment(&self) -> Result<OrderPlaced, CheckoutError> {
        let _submitting = SubmittingGuard::acquire(&self.submitting)?;

        let order = self.build_order()?;

        let order_id = match self.orders.place_order(order.clone()).await {
            Ok(order_id) => order_id,
            Err(source) => {
                error!(error = %source, "failed to save order");

                return Err(source.into());
            }
        };

        Span::current().record("order_id", tracing::field::display(&order_id));

        self.lock().state = CheckoutState::Submitted;

        info!(%order_id, total_amount = order.total_amount, "order submitted");

        self.navigator.navigate(Route::ThankYou);

        let clear = match self.settings.clear_policy {
            ClearPolicy::AfterDelay(delay) => DeferredClear::after(Arc::clone(&self.cart), delay),
            ClearPolicy::OnAcknowledge => DeferredClear::on_acknowledge(Arc::clone(&self.cart)),
        };

        Ok(OrderPlaced {
            order_id,
            order,
            clear,
        })
    }

    fn build_order(&self) -> Result<NewOrder, CheckoutError> {
        let inner = self.lock();

        if inner.state != CheckoutState::Confirming {
            return Err(CheckoutError::InvalidState {
                current: inner.state,
                expected: CheckoutState::Confirming,
            });
        }

        Ok(NewOrder::bank_transfer(
            self.cart.snapshot().lines(),
            &inner.delivery,
            self.idempotency_key,
        )?)
    }

    fn lock(&self) -> MutexGuard<'_, FlowState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Holds the "submitting" flag for the duration of one write attempt and
/// releases it on every exit path.
struct SubmittingGuard<'a>(&'a AtomicBool);

impl<'a> SubmittingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, CheckoutError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(flag))
            .map_err(|_already| CheckoutError::AlreadySubmitting)
    }
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
