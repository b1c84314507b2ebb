//! # Gamepad Bridge Library
//!
//! Drive a virtual game controller from keyboard and mouse input.
//!
//! This library provides the core of a keyboard/mouse to gamepad bridge:
//! scan code bindings for buttons and the left stick, mouse motion shaping for
//! the right stick, selective suppression of captured input, and a session
//! orchestrator with pause, panic and inactivity re-centering.
//!
//! Capture drivers and virtual controller drivers plug in through the
//! [`capture::InputCapture`] and [`controller::GamepadOutput`] traits.

pub mod capture;
pub mod config;
pub mod controller;
pub mod error;
pub mod mapping;
pub mod orchestrator;
