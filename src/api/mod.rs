//! HTTP layer: handlers, middleware, DTOs and the generic resource routes.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod resource;
pub mod routes;
mod doc;
