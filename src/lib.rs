// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Federated search over the site's content API: one endpoint that merges blogs,
//! courses, authors, books, events, fatwas, articles, awlyaa and tasawwuf records
//! into a single result list.

pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
