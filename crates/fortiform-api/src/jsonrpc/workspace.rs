// ADOM workspace locking
//
// With workspace mode enabled on the FortiManager, writes to an ADOM must
// happen between a lock and a commit. These helpers wrap the three `exec`
// calls; sequencing is left to the caller.

use tracing::debug;

use crate::error::Error;
use crate::jsonrpc::client::JsonRpcClient;
use crate::jsonrpc::models::Method;

fn workspace_url(adom: &str, action: &str) -> String {
    if adom == "global" {
        format!("/dvmdb/global/workspace/{action}")
    } else {
        format!("/dvmdb/adom/{adom}/workspace/{action}")
    }
}

impl JsonRpcClient {
    /// Acquire the workspace lock on an ADOM.
    pub async fn lock_adom(&self, adom: &str) -> Result<(), Error> {
        debug!(adom, "locking workspace");
        self.call(Method::Exec, &workspace_url(adom, "lock"), None)
            .await
            .map(|_| ())
    }

    /// Commit pending workspace changes on an ADOM.
    pub async fn commit_adom(&self, adom: &str) -> Result<(), Error> {
        debug!(adom, "committing workspace");
        self.call(Method::Exec, &workspace_url(adom, "commit"), None)
            .await
            .map(|_| ())
    }

    /// Release the workspace lock on an ADOM.
    pub async fn unlock_adom(&self, adom: &str) -> Result<(), Error> {
        debug!(adom, "unlocking workspace");
        self.call(Method::Exec, &workspace_url(adom, "unlock"), None)
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::workspace_url;

    #[test]
    fn global_adom_has_its_own_path() {
        assert_eq!(
            workspace_url("global", "lock"),
            "/dvmdb/global/workspace/lock"
        );
        assert_eq!(
            workspace_url("root", "commit"),
            "/dvmdb/adom/root/workspace/commit"
        );
    }
}
