mod filter_bar;
mod idea_card;
mod idea_form;
mod stats_panel;

pub use filter_bar::FilterBar;
pub use idea_card::IdeaCard;
pub use idea_form::IdeaForm;
pub use stats_panel::StatsPanel;
