pub mod demo_feed;
pub mod export;
pub mod leaderboard;
pub mod net;
pub mod open_data;
pub mod sdq;
pub mod state;
