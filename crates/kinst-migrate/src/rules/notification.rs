use kinst_model::Mapping;

/// `notification` is no longer configurable.
pub(super) fn migrate(spec: &mut Mapping, _status: Option<&Mapping>) -> bool {
    spec.remove("notification").is_some()
}
