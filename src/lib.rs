//! Движок стола Texas Hold'em (No-Limit).
//!
//! Слои:
//! - `domain` – карты, фишки, игроки, конфиг стола;
//! - `eval` – оценка покерных комбинаций;
//! - `engine` – авторитетное состояние стола, ставки, улицы, банки;
//! - `api` – проекция состояния для конкретного игрока;
//! - `history` – компактная запись раздачи и её кодек;
//! - `replay` – детерминированное воспроизведение записанной раздачи;
//! - `bot` – стратегии ботов;
//! - `session` – единая точка сериализации шагов одного стола (tokio);
//! - `infra` – RNG, генерация id, хранилище историй.

pub mod api;
pub mod bot;
pub mod domain;
pub mod engine;
pub mod eval;
pub mod history;
pub mod infra;
pub mod replay;
pub mod session;
