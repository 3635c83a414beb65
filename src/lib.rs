//! Minigame scoreboard backend: a persisted roster of players scored across
//! three minigames, served over REST with a live SSE feed.

pub mod config;
pub mod dao;
pub mod dto;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;
