//! Listen-key lifecycle for the private user-data stream.
//!
//! A listen key expires after 60 minutes unless extended. The stream itself
//! is consumed elsewhere; this module only issues, extends and closes keys.
//!
//! | Operation | Method | Path                              |
//! |-----------|--------|-----------------------------------|
//! | Create    | POST   | `/openApi/user/auth/userDataStream` |
//! | Extend    | PUT    | `/openApi/user/auth/userDataStream` |
//! | Close     | DELETE | `/openApi/user/auth/userDataStream` |

use bx_core::error::BxError;
use tracing::{debug, info};

use super::SignedApiClient;
use crate::request::{Method, RequestSpec};
use crate::response::ApiResponse;

const USER_DATA_STREAM: &str = "/openApi/user/auth/userDataStream";

impl SignedApiClient {
    /// Issue a listen key. The key is at `data.listenKey`.
    pub async fn create_listen_key(&self) -> Result<ApiResponse, BxError> {
        let resp = self.execute(RequestSpec::signed(Method::Post, USER_DATA_STREAM)).await?;
        if resp.data.get("listenKey").and_then(|v| v.as_str()).is_none() {
            return Err(BxError::MalformedResponse {
                status: 200,
                body: "listenKey not found in response".into(),
            });
        }
        info!("[bingx] listen key created");
        Ok(resp)
    }

    /// Push the expiry of `listen_key` out by another 60 minutes.
    pub async fn extend_listen_key(&self, listen_key: &str) -> Result<ApiResponse, BxError> {
        let spec = RequestSpec::signed(Method::Put, USER_DATA_STREAM).param("listenKey", listen_key);
        let resp = self.execute(spec).await?;
        debug!("[bingx] listen key keepalive sent");
        Ok(resp)
    }

    pub async fn close_listen_key(&self, listen_key: &str) -> Result<ApiResponse, BxError> {
        let spec = RequestSpec::signed(Method::Delete, USER_DATA_STREAM).param("listenKey", listen_key);
        let resp = self.execute(spec).await?;
        info!("[bingx] listen key closed");
        Ok(resp)
    }
}
