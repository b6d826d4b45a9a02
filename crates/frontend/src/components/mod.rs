pub mod dialogs;
pub mod map_view;
pub mod menu;
