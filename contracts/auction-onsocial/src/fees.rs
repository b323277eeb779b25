use crate::constants::BASIS_POINTS;

/// `floor(amount * bps / 10000)`, split so the multiplication cannot overflow.
pub(crate) fn bps_of(amount: u128, bps: u16) -> u128 {
    let base = BASIS_POINTS as u128;
    let bps = bps as u128;
    (amount / base) * bps + (amount % base) * bps / base
}

/// Returns `(platform_fee, seller_proceeds)`; the two always sum to `amount`.
pub(crate) fn split_proceeds(amount: u128, fee_bps: u16) -> (u128, u128) {
    let fee = bps_of(amount, fee_bps.min(BASIS_POINTS));
    (fee, amount - fee)
}
