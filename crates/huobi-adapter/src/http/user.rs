/*
[INPUT]:  Account identifiers and API key credentials
[OUTPUT]: Account list and balances
[POS]:    HTTP layer - account endpoints (signed GET)
[UPDATE]: When adding new account endpoints or changing query parameters
*/

use crate::error::Result;
use crate::http::HuobiClient;
use crate::types::{Account, AccountBalance};

impl HuobiClient {
    /// GET /v1/account/accounts
    pub async fn get_accounts(&self) -> Result<Vec<Account>> {
        self.signed_get("/v1/account/accounts", &[]).await
    }

    /// GET /v1/account/accounts/{account-id}/balance
    pub async fn get_account_balance(&self, account_id: u64) -> Result<AccountBalance> {
        let endpoint = format!("/v1/account/accounts/{account_id}/balance");
        self.signed_get(&endpoint, &[]).await
    }
}
