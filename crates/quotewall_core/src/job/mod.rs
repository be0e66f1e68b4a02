//! Unattended entry points driven by the host's background scheduler.

pub mod daily_wallpaper;
