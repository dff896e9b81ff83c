use shadowscan_core::DetectionRequest;

use super::ValidationResult;

/// Sections may be empty; only the identity fields are required.
pub(super) fn validate_request(request: &DetectionRequest, result: &mut ValidationResult) {
    if request.method.trim().is_empty() {
        result.error("method", "HTTP method is missing");
    }
    if request.path.trim().is_empty() {
        result.error("path", "path is missing");
    }
}
