// Copyright 2020 Zachary Stewart
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Model for Claimers, a turn-based territory-conquest board game.
//!
//! The game is played on a rectangular [`board`] of tiles. Every tile lies on a map
//! territory whose [`terrain`] shapes how well each troop type moves and fights there.
//! The [`terrain`] module holds the modifier engine that turns a troop type and a
//! territory into a pair of movement and combat multipliers.
//!
//! Games are stored through the [`store::Repository`] trait and driven by the
//! [`service::GameService`]. [`layout`] computes where tiles land on a fixed-size canvas
//! and [`catalog`] loads troop types and authored territories from YAML.

pub mod board;
pub mod catalog;
pub mod ids;
pub mod layout;
pub mod service;
pub mod session;
pub mod store;
pub mod terrain;

pub use crate::{
    terrain::{compute_modifiers, TerrainModifier},
    service::GameService,
    store::{MemoryStore, Repository},
};
