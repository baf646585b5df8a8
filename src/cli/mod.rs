// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI subsystem for the trimm binary

pub mod commands;
pub mod reporter;

pub use commands::NormalsSummary;
pub use reporter::Reporter;
