use crate::terminal::colors;
use colored::*;
use lanprobe_common::network::device::DeviceRecord;
use pnet::util::MacAddr;

const EMPTY: &str = "—";

pub fn device_row(record: &DeviceRecord) -> [ColoredString; 3] {
    [
        record.address.to_string().color(colors::IPV4_ADDR),
        ports_to_cell(record),
        mac_to_cell(record.mac),
    ]
}

fn ports_to_cell(record: &DeviceRecord) -> ColoredString {
    if record.ports.is_empty() {
        return EMPTY.color(colors::SEPARATOR);
    }
    record.ports_joined().color(colors::PORT)
}

fn mac_to_cell(mac: Option<MacAddr>) -> ColoredString {
    match mac {
        Some(mac) => mac.to_string().to_uppercase().color(colors::MAC_ADDR),
        None => EMPTY.color(colors::SEPARATOR),
    }
}
