use wab_entities::address::Address;

/// Splits a geocoder display name like
/// "Milchstraße 1, 70180 Stuttgart, Deutschland" into address lines.
pub(crate) fn address_from_display_name(display_name: &str) -> Address {
    let lines = display_name
        .split(',')
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect();
    Address { lines }
}
