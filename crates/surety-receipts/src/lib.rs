//! # surety-receipts — The Receipt Hub
//!
//! Accepts signed execution receipts, runs the challenge window, and
//! settles disputes that are mechanically checkable:
//!
//! - **Records** ([`record`]): receipt and dispute record shapes and the
//!   receipt status machine (`Posted → {Finalized | Disputed}`,
//!   `Disputed → {Finalized | Slashed}`).
//!
//! - **Hub** ([`hub`]): the component. Posting validates executor
//!   status, operator signature, content-hash uniqueness, expiry, and
//!   stake coverage; disputes lock stake through the registry; the
//!   deterministic resolver settles mechanical reason codes against
//!   recorded settlement attestations with the 80/15/5 distribution.
//!
//! - **Settlement attestations** ([`settlement`]): the adapter boundary
//!   through which protocol adapters record what actually settled.
//!
//! - **Reputation sink** ([`sink`]): the best-effort outbound push of
//!   settlement outcomes. Sink failure is logged and recorded, never
//!   propagated — settlement cannot be blocked by an external registry.

pub mod error;
pub mod event;
pub mod hub;
pub mod record;
pub mod settlement;
pub mod sink;

pub use error::ReceiptError;
pub use event::HubEvent;
pub use hub::{HubCapability, ReceiptHub};
pub use record::{DisputeRecord, ReceiptRecord, ReceiptStatus};
pub use settlement::SettlementAttestation;
pub use sink::{NullSink, ReputationSink, ReputationUpdate, SettlementOutcome, SinkError};
