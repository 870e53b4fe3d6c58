// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod local;
pub mod models;
pub mod notify;
pub mod remote;
pub mod schedule;
pub mod status;
pub mod store;
pub mod utils;
pub mod views;
pub mod wire;
