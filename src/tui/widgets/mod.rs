pub mod cards;
pub mod help;
pub mod player_bar;
pub mod root;
