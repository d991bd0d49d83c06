// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod logging;
pub mod matcher;
pub mod normalizer;
pub mod search;
pub mod upstream;
