use crate::Tick;

const HALF: Tick = Tick::MAX / 2 + 1;

/// Returns whether tick `a` comes after tick `b`, accounting for wrap-around.
/// tick_greater_than(2, 1) == true
/// tick_greater_than(0, 65535) == true
/// tick_greater_than(1, 1) == false
pub fn tick_greater_than(a: Tick, b: Tick) -> bool {
    let forward = a.wrapping_sub(b);
    forward != 0 && forward < HALF
}

/// Returns whether tick `a` comes before tick `b`, accounting for wrap-around.
pub fn tick_less_than(a: Tick, b: Tick) -> bool {
    tick_greater_than(b, a)
}
