/// Classification of the datastore's answer to a configuration upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// 201 or 204.
    Success,
    /// 400, the datastore rejected the document structure or semantics.
    ValidationError,
    /// 401 or 403.
    AuthError(u16),
    /// 409 or 422.
    ConflictError(u16),
    UnexpectedError(u16),
}

impl UploadOutcome {
    pub fn from_status(status: u16) -> UploadOutcome {
        match status {
            201 | 204 => UploadOutcome::Success,
            400 => UploadOutcome::ValidationError,
            401 | 403 => UploadOutcome::AuthError(status),
            409 | 422 => UploadOutcome::ConflictError(status),
            _ => UploadOutcome::UnexpectedError(status),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Success)
    }
}

/// An existing endpoint or an auth rejection still proves the server is alive.
pub fn is_reachable(status: u16) -> bool {
    matches!(status, 200 | 401 | 404)
}

pub fn is_rpc_success(status: u16) -> bool {
    matches!(status, 200 | 204)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_upload_outcome_table() {
        assert_eq!(UploadOutcome::from_status(201), UploadOutcome::Success);
        assert_eq!(UploadOutcome::from_status(204), UploadOutcome::Success);
        assert_eq!(UploadOutcome::from_status(400), UploadOutcome::ValidationError);
        assert_eq!(UploadOutcome::from_status(401), UploadOutcome::AuthError(401));
        assert_eq!(UploadOutcome::from_status(403), UploadOutcome::AuthError(403));
        assert_eq!(UploadOutcome::from_status(409), UploadOutcome::ConflictError(409));
        assert_eq!(UploadOutcome::from_status(422), UploadOutcome::ConflictError(422));
        assert_eq!(UploadOutcome::from_status(200), UploadOutcome::UnexpectedError(200));
        assert_eq!(UploadOutcome::from_status(500), UploadOutcome::UnexpectedError(500));
        assert!(UploadOutcome::Success.is_success());
        assert!(!UploadOutcome::ConflictError(409).is_success());
    }

    #[test]
    fn test_probe_statuses() {
        for status in [200, 401, 404] {
            assert!(is_reachable(status), "{}", status);
        }
        for status in [201, 204, 403, 500, 502, 503] {
            assert!(!is_reachable(status), "{}", status);
        }
    }

    #[test]
    fn test_rpc_statuses() {
        assert!(is_rpc_success(200));
        assert!(is_rpc_success(204));
        assert!(!is_rpc_success(201));
        assert!(!is_rpc_success(400));
    }
}
