mod dispatch;
mod expansion;
mod helpers;
mod resources;
mod transaction;
