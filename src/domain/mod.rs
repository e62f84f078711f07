//! Gateway callback domain: the notification record, its checksum and the
//! payment status lifecycle. Everything here is pure.

pub mod checksum;
pub mod notification;
pub mod ports;
pub mod status;
