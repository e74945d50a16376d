//! Presentation of order states: label, icon, color and the step in the progress bar

/// Step of a cancelled order, and of any state the tables do not know
pub const CANCELLED: u32 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateConfig {
    pub label: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub step: u32,
}

const fn state(label: &'static str, icon: &'static str, color: &'static str, step: u32) -> StateConfig {
    StateConfig {
        label,
        icon,
        color,
        step,
    }
}

/// States of an order received from a supplier
pub const INBOUND_ORDER_STATES: &[(&str, StateConfig)] = &[
    ("draft", state("Koncept", "sym_o_draft", "gray", 1)),
    ("submitted", state("Potvrzeno", "sym_o_local_shipping", "primary", 2)),
    ("putaway", state("Příjem", "sym_o_warehouse", "accent", 3)),
    ("completed", state("Dokončeno", "sym_o_check_circle", "positive", 4)),
    ("cancelled", state("Zrušeno", "sym_o_cancel", "negative", CANCELLED)),
];

/// States of a warehouse receipt
pub const INBOUND_WAREHOUSE_ORDER_STATES: &[(&str, StateConfig)] = &[
    ("draft", state("Koncept", "sym_o_ink_pen", "grey-7", 1)),
    ("pending", state("Připraveno", "sym_o_pallet", "orange-8", 2)),
    ("started", state("Příjem zahájen", "sym_o_avg_pace", "cyan-8", 3)),
    ("completed", state("Přijato", "sym_o_check_circle", "positive", 4)),
    ("cancelled", state("Zrušeno", "sym_o_cancel", "negative", CANCELLED)),
];

fn lookup(table: &'static [(&'static str, StateConfig)], name: &str) -> Option<&'static StateConfig> {
    table
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, config)| config)
}

pub fn inbound_order_state(name: &str) -> Option<&'static StateConfig> {
    lookup(INBOUND_ORDER_STATES, name)
}

pub fn inbound_order_step(name: &str) -> u32 {
    inbound_order_state(name).map_or(CANCELLED, |config| config.step)
}

pub fn inbound_warehouse_order_state(name: &str) -> Option<&'static StateConfig> {
    lookup(INBOUND_WAREHOUSE_ORDER_STATES, name)
}

/// Step of a warehouse receipt. No order counts as cancelled.
pub fn inbound_warehouse_order_step(name: Option<&str>) -> u32 {
    name.and_then(inbound_warehouse_order_state)
        .map_or(CANCELLED, |config| config.step)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps() {
        assert_eq!(inbound_order_step("submitted"), 2);
        assert_eq!(inbound_order_step("in_transit"), CANCELLED);
        assert_eq!(inbound_warehouse_order_step(Some("started")), 3);
        assert_eq!(inbound_warehouse_order_step(None), CANCELLED);
        assert_eq!(inbound_warehouse_order_state("pending").unwrap().label, "Připraveno");
    }
}
