//! Test suite for userdesk
//!
//! This module organizes all tests
