pub mod button;
pub mod card;
pub mod feedback;
pub mod field;

// Re-export so callers can `use crate::components::ui::Button` etc.
pub use button::*;
pub use card::*;
pub use feedback::*;
pub use field::*;
