mod dialogs;
mod grid;
mod images;
mod toolbar;
mod users;
