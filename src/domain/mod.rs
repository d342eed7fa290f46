pub mod confirmation;
pub mod error;
pub mod intent;
pub mod money;
pub mod record;
