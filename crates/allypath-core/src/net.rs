//! CIDR prefixes shared by exit policies and the prefix geolocator.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// An IP network given as address plus prefix length.
///
/// The stored address is masked to the prefix on construction, so
/// `10.1.2.3/8` and `10.0.0.0/8` compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpPrefix {
    network: IpAddr,
    len: u8,
}

impl IpPrefix {
    /// Build a prefix, returning `None` when `len` exceeds the address width.
    pub fn new(addr: IpAddr, len: u8) -> Option<Self> {
        let network = match addr {
            IpAddr::V4(v4) => {
                if len > 32 {
                    return None;
                }
                IpAddr::V4(Ipv4Addr::from(u32::from(v4) & v4_mask(len)))
            }
            IpAddr::V6(v6) => {
                if len > 128 {
                    return None;
                }
                IpAddr::V6(Ipv6Addr::from(u128::from(v6) & v6_mask(len)))
            }
        };
        Some(Self { network, len })
    }

    /// A prefix covering exactly one address.
    pub fn host(addr: IpAddr) -> Self {
        let len = if addr.is_ipv4() { 32 } else { 128 };
        Self { network: addr, len }
    }

    /// Network address.
    pub fn network(&self) -> IpAddr {
        self.network
    }

    /// Prefix length in bits.
    pub fn len(&self) -> u8 {
        self.len
    }

    /// True for `/0`.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `addr` falls inside this network. Families never match across.
    pub fn contains(&self, addr: &IpAddr) -> bool {
        match (self.network, addr) {
            (IpAddr::V4(net), IpAddr::V4(ip)) => {
                u32::from(*ip) & v4_mask(self.len) == u32::from(net)
            }
            (IpAddr::V6(net), IpAddr::V6(ip)) => {
                u128::from(*ip) & v6_mask(self.len) == u128::from(net)
            }
            _ => false,
        }
    }
}

impl fmt::Display for IpPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.len)
    }
}

/// Parses `addr`, `addr/len`, `[v6]` and `[v6]/len`.
impl FromStr for IpPrefix {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, len) = match s.split_once('/') {
            Some((addr, len)) => (addr, Some(len.parse::<u8>().map_err(|_| ())?)),
            None => (s, None),
        };
        let addr = addr
            .strip_prefix('[')
            .and_then(|a| a.strip_suffix(']'))
            .unwrap_or(addr);
        let addr: IpAddr = addr.parse().map_err(|_| ())?;
        match len {
            Some(len) => Self::new(addr, len).ok_or(()),
            None => Ok(Self::host(addr)),
        }
    }
}

fn v4_mask(len: u8) -> u32 {
    if len == 0 {
        0
    } else {
        u32::MAX << (32 - u32::from(len))
    }
}

fn v6_mask(len: u8) -> u128 {
    if len == 0 {
        0
    } else {
        u128::MAX << (128 - u32::from(len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_prefix_contains_v4() {
        let prefix: IpPrefix = "185.199.108.0/22".parse().unwrap();
        assert!(prefix.contains(&ip("185.199.111.153")));
        assert!(!prefix.contains(&ip("185.199.112.1")));
    }

    #[test]
    fn test_prefix_is_masked() {
        let a: IpPrefix = "10.1.2.3/8".parse().unwrap();
        let b: IpPrefix = "10.0.0.0/8".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "10.0.0.0/8");
    }

    #[test]
    fn test_prefix_zero_length_matches_family_only() {
        let any_v4: IpPrefix = "0.0.0.0/0".parse().unwrap();
        assert!(any_v4.contains(&ip("203.0.113.7")));
        assert!(!any_v4.contains(&ip("2001:db8::1")));
    }

    #[test]
    fn test_prefix_v6_bracketed() {
        let prefix: IpPrefix = "[2001:db8::]/32".parse().unwrap();
        assert!(prefix.contains(&ip("2001:db8:ffff::1")));
        assert!(!prefix.contains(&ip("2001:db9::1")));
    }

    #[test]
    fn test_host_prefix() {
        let prefix: IpPrefix = "192.0.2.10".parse().unwrap();
        assert_eq!(prefix.len(), 32);
        assert!(prefix.contains(&ip("192.0.2.10")));
        assert!(!prefix.contains(&ip("192.0.2.11")));
    }

    #[test]
    fn test_prefix_rejects_garbage() {
        assert!("10.0.0.0/33".parse::<IpPrefix>().is_err());
        assert!("not-an-ip".parse::<IpPrefix>().is_err());
        assert!("10.0.0.0/x".parse::<IpPrefix>().is_err());
    }
}
