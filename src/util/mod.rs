// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Stateless utility functions.

pub mod color;
pub mod geometry;
