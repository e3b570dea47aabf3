//! Repository implementations.

pub mod directory;
pub mod ledger;
pub mod period;
pub mod regulation;
pub mod violation;

pub use directory::DirectoryRepository;
pub use ledger::LedgerRepository;
pub use period::WorkPeriodRepository;
pub use regulation::RegulationRepository;
pub use violation::ViolationRepository;
