use crate::*;
use near_sdk::PromiseResult;

pub(crate) fn check_one_yocto() -> Result<(), AuctionError> {
    if env::attached_deposit().as_yoctonear() != ONE_YOCTO.as_yoctonear() {
        return Err(AuctionError::InsufficientDeposit(
            "Requires attached deposit of exactly 1 yoctoNEAR".into(),
        ));
    }
    Ok(())
}

pub(crate) fn check_at_least_one_yocto() -> Result<(), AuctionError> {
    if env::attached_deposit().as_yoctonear() < ONE_YOCTO.as_yoctonear() {
        return Err(AuctionError::InsufficientDeposit(
            "Requires attached deposit of at least 1 yoctoNEAR".into(),
        ));
    }
    Ok(())
}

/// `true` when the single promise this callback waits on succeeded.
pub(crate) fn single_promise_succeeded(max_len: usize) -> bool {
    env::promise_results_count() == 1 && env::promise_result_checked(0, max_len).is_ok()
}

/// Like [`single_promise_succeeded`] but ignores the size of the returned value.
#[allow(deprecated)]
pub(crate) fn promise_succeeded() -> bool {
    env::promise_results_count() == 1
        && matches!(env::promise_result(0), PromiseResult::Successful(_))
}

impl Contract {
    pub(crate) fn check_admin(&self, actor_id: &AccountId) -> Result<(), AuctionError> {
        if actor_id != &self.config.admin {
            return Err(AuctionError::only_admin());
        }
        Ok(())
    }
}
