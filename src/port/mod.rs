//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams between the strategy executors and the outside
//! world. Executors hold them as `Arc<dyn Trait>` and never see which
//! adapter sits behind them.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!     ┌──────────────┤  TWAP / Grid / Bracket  ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │Exchange │            │    Clock    │              │ Notifier  │
//! │ Adapter │            │   Adapter   │              │  Adapter  │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```

pub mod outbound;

pub use outbound::clock::Clock;
pub use outbound::exchange::ExchangeGateway;
pub use outbound::notifier::{Event, LogNotifier, Notifier, NotifierRegistry, NullNotifier};
