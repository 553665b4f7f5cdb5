// src/services/geohash.rs
// DOCUMENTATION: Geohash bucketing for spatial cache sharding
// PURPOSE: Derive a fixed-precision spatial key from a latitude/longitude pair

/// Standard geohash base32 alphabet (no a, i, l, o)
const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Encode a coordinate pair into a geohash string
/// DOCUMENTATION: Deterministic, pure function - same inputs always yield the
/// same bucket. Two coordinates sharing a bucket are within a bounded distance
/// of each other (precision-dependent: 5 chars is roughly a 4.9km x 4.9km cell).
///
/// The bucket is purely a cache-sharding key; distance ranking never relies
/// on it. Callers must reject out-of-range coordinates before this stage.
///
/// # Arguments
/// * `lat` - latitude in [-90, 90]
/// * `lon` - longitude in [-180, 180]
/// * `precision` - number of geohash characters to produce
pub fn encode(lat: f64, lon: f64, precision: usize) -> String {
    let mut lat_range = (-90.0_f64, 90.0_f64);
    let mut lon_range = (-180.0_f64, 180.0_f64);

    let mut hash = String::with_capacity(precision);
    let mut bits: u8 = 0;
    let mut bit_count: u8 = 0;
    // Geohash interleaves longitude and latitude bits, longitude first
    let mut even_bit = true;

    while hash.len() < precision {
        if even_bit {
            let mid = (lon_range.0 + lon_range.1) / 2.0;
            if lon >= mid {
                bits = (bits << 1) | 1;
                lon_range.0 = mid;
            } else {
                bits <<= 1;
                lon_range.1 = mid;
            }
        } else {
            let mid = (lat_range.0 + lat_range.1) / 2.0;
            if lat >= mid {
                bits = (bits << 1) | 1;
                lat_range.0 = mid;
            } else {
                bits <<= 1;
                lat_range.1 = mid;
            }
        }

        even_bit = !even_bit;
        bit_count += 1;

        // 5 bits per base32 character
        if bit_count == 5 {
            hash.push(BASE32[bits as usize] as char);
            bits = 0;
            bit_count = 0;
        }
    }

    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_geohash_values() {
        // Reference vectors from the original geohash definition
        assert_eq!(encode(57.64911, 10.40744, 11), "u4pruydqqvj");
        assert_eq!(encode(41.6488, -0.8891, 5), "ezrkg");
        assert_eq!(encode(0.0, 0.0, 5), "s0000");
    }

    #[test]
    fn test_encode_is_deterministic() {
        let first = encode(40.4168, -3.7038, 5);
        for _ in 0..10 {
            assert_eq!(encode(40.4168, -3.7038, 5), first);
        }
    }

    #[test]
    fn test_precision_controls_length() {
        for precision in 1..=12 {
            assert_eq!(encode(48.8566, 2.3522, precision).len(), precision);
        }
    }

    #[test]
    fn test_longer_hash_refines_shorter() {
        let coarse = encode(51.5074, -0.1278, 4);
        let fine = encode(51.5074, -0.1278, 8);
        assert!(fine.starts_with(&coarse));
    }

    #[test]
    fn test_nearby_points_share_bucket() {
        // ~100m apart, well inside one precision-5 cell
        let a = encode(41.6488, -0.8891, 5);
        let b = encode(41.6495, -0.8885, 5);
        assert_eq!(a, b);

        // Opposite hemispheres never share a bucket
        let c = encode(-41.6488, 0.8891, 5);
        assert_ne!(a, c);
    }
}
