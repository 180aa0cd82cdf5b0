//! Memory address type.

use std::fmt;
use std::ops::{Add, Sub};

/// Strongly typed memory address inside the target process
///
/// This wrapper around `u64` provides type safety when working with target
/// addresses. It prevents accidentally mixing addresses with other `u64`
/// values (like byte caps, discriminants, or interned ids), which matters
/// here because reference-shaped handles are reconstructed from raw storage
/// bytes that merely *happen* to contain an address.
///
/// ## Example
///
/// ```rust
/// use periscope_core::types::Address;
///
/// let addr = Address::from(0x1000);
/// let next_addr = addr + 0x100; // Add offset
/// assert_eq!(next_addr.value(), 0x1100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(u64);

impl Address
{
    /// The null address (0x0)
    ///
    /// Reading a reference's storage and finding this value means the alias
    /// was never initialized; the resolver treats such matches as not found.
    pub const ZERO: Self = Address(0);

    /// Create a new address from a `u64` value
    ///
    /// Equivalent to `Address::from(value)` but usable in const contexts.
    pub const fn new(value: u64) -> Self
    {
        Address(value)
    }

    /// Get the raw `u64` value of this address
    ///
    /// Use this when handing the address back to the host's raw-memory APIs.
    pub const fn value(self) -> u64
    {
        self.0
    }

    /// Returns `true` if this is the null address.
    pub const fn is_null(self) -> bool
    {
        self.0 == 0
    }

    /// Add an offset to this address, checking for overflow
    ///
    /// Returns `Some(new_address)` if the addition doesn't overflow, or `None` if it does.
    pub fn checked_add(self, offset: u64) -> Option<Self>
    {
        self.0.checked_add(offset).map(Address)
    }

    /// Subtract an offset from this address, checking for underflow
    ///
    /// Returns `Some(new_address)` if the subtraction doesn't underflow, or `None` if it does.
    pub fn checked_sub(self, offset: u64) -> Option<Self>
    {
        self.0.checked_sub(offset).map(Address)
    }
}

impl From<u64> for Address
{
    fn from(value: u64) -> Self
    {
        Address(value)
    }
}

impl From<Address> for u64
{
    fn from(address: Address) -> Self
    {
        address.0
    }
}

impl fmt::Display for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "0x{:016x}", self.0)
    }
}

impl Add<u64> for Address
{
    type Output = Address;

    fn add(self, rhs: u64) -> Self::Output
    {
        Address(self.0.wrapping_add(rhs))
    }
}

impl Sub<u64> for Address
{
    type Output = Address;

    fn sub(self, rhs: u64) -> Self::Output
    {
        Address(self.0.wrapping_sub(rhs))
    }
}
