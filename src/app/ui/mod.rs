mod controls;
mod details;
mod login;
mod panels;
mod playback;
