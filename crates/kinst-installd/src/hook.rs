use serde_json::{Value, json};

use kinst_model::{DOCUMENT_KIND, DOCUMENT_NAME, DOCUMENT_NAMESPACE};

/// Hook registration printed in `--config` mode: re-run on every add/update of the configuration object.
pub fn hook_config() -> Value {
    json!({
        "onKubernetesEvent": [{
            "name": "Monitor clusterconfiguration",
            "kind": DOCUMENT_KIND,
            "event": ["add", "update"],
            "objectName": DOCUMENT_NAME,
            "namespaceSelector": {"matchNames": [DOCUMENT_NAMESPACE]},
            "jqFilter": ".spec",
            "allowFailure": false
        }]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watches_the_configuration_object() {
        let hook = hook_config();
        let watch = &hook["onKubernetesEvent"][0];
        assert_eq!(watch["kind"], "ClusterConfiguration");
        assert_eq!(watch["objectName"], "ks-installer");
        assert_eq!(watch["namespaceSelector"]["matchNames"], json!(["kubesphere-system"]));
        assert_eq!(watch["event"], json!(["add", "update"]));
        assert_eq!(watch["allowFailure"], false);
    }
}
