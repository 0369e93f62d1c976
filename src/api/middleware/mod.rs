//! API middleware.
//!
//! Only bearer authentication sits in front of the resource routes; the
//! health check and the real-time channel are mounted outside it.

pub mod auth;
