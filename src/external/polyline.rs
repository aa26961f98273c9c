use crate::entities::Coordinates;
use crate::error::{upstream_error, Error};

const PRECISION: f64 = 1e5;

/// Decodes an encoded polyline (precision 5) as used by the directions API.
pub fn decode(encoded: &str) -> Result<Vec<Coordinates>, Error> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut path = vec![];

    while index < bytes.len() {
        lat = lat
            .checked_add(next_value(bytes, &mut index)?)
            .ok_or_else(|| upstream_error())?;
        lng = lng
            .checked_add(next_value(bytes, &mut index)?)
            .ok_or_else(|| upstream_error())?;

        path.push(Coordinates::new(lat as f64 / PRECISION, lng as f64 / PRECISION));
    }

    Ok(path)
}

fn next_value(bytes: &[u8], index: &mut usize) -> Result<i64, Error> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let byte = *bytes.get(*index).ok_or_else(|| upstream_error())?;
        if !(63..127).contains(&byte) || shift > 60 {
            return Err(upstream_error());
        }
        *index += 1;

        let chunk = (byte - 63) as i64;
        result |= (chunk & 0x1f) << shift;
        shift += 5;

        if chunk < 0x20 {
            break;
        }
    }

    Ok(if result & 1 != 0 { !(result >> 1) } else { result >> 1 })
}

#[test]
fn decode_reference_polyline() {
    let path = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();

    assert_eq!(
        path,
        vec![
            Coordinates::new(38.5, -120.2),
            Coordinates::new(40.7, -120.95),
            Coordinates::new(43.252, -126.453),
        ]
    );
}

#[test]
fn decode_empty_polyline() {
    assert_eq!(decode("").unwrap(), vec![]);
}

#[test]
fn decode_rejects_overflowing_coordinates() {
    // 2^62 - 1 per value, so the third latitude step leaves i64
    let max_delta = format!("}}{}F", "~".repeat(11));
    let encoded = format!("{0}{0}", max_delta).repeat(3);

    assert_eq!(decode(&encoded), Err(upstream_error()));
}

#[test]
fn decode_truncated_polyline_fails() {
    // latitude without its longitude
    assert!(decode("_p~iF").is_err());
}
