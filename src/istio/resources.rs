//! Istio routing builders
//!
//! The gateway accepts HTTP on port 80 at the default ingress gateway and the
//! virtual service sends all of it to the AwairPoller service.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use super::types::*;
use crate::k8s::{GATEWAY_NAME, NAMESPACE, SERVICE_NAME, VIRTUAL_SERVICE_NAME};

/// Create the Gateway bound to `istio=ingressgateway`
pub fn build_gateway() -> Gateway {
    Gateway {
        api_version: api_version(),
        kind: "Gateway".to_string(),
        metadata: ObjectMeta {
            name: Some(GATEWAY_NAME.to_string()),
            namespace: Some(NAMESPACE.to_string()),
            ..Default::default()
        },
        spec: GatewaySpec {
            servers: vec![Server {
                port: Port {
                    number: 80,
                    protocol: Some("HTTP".to_string()),
                    name: Some("http".to_string()),
                },
                hosts: vec!["*".to_string()],
                name: Some("HTTP".to_string()),
            }],
            selector: [("istio".to_string(), "ingressgateway".to_string())]
                .into_iter()
                .collect(),
        },
        status: None,
    }
}

/// Create the VirtualService routing every host through the gateway
pub fn build_virtual_service() -> VirtualService {
    VirtualService {
        api_version: api_version(),
        kind: "VirtualService".to_string(),
        metadata: ObjectMeta {
            name: Some(VIRTUAL_SERVICE_NAME.to_string()),
            namespace: Some(NAMESPACE.to_string()),
            ..Default::default()
        },
        spec: VirtualServiceSpec {
            hosts: vec!["*".to_string()],
            gateways: vec![GATEWAY_NAME.to_string()],
            http: vec![HttpRoute {
                route: vec![HttpRouteDestination {
                    destination: Destination {
                        host: SERVICE_NAME.to_string(),
                        subset: None,
                    },
                    weight: Some(100),
                }],
            }],
        },
        status: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_gateway() {
        let gateway = build_gateway();
        let json = serde_json::to_value(&gateway).unwrap();

        assert_eq!(json["apiVersion"], "networking.istio.io/v1alpha3");
        assert_eq!(json["kind"], "Gateway");
        assert_eq!(json["metadata"]["name"], "static-site-gateway");
        assert_eq!(json["spec"]["selector"]["istio"], "ingressgateway");
        assert_eq!(json["spec"]["servers"][0]["port"]["number"], 80);
        assert_eq!(json["spec"]["servers"][0]["hosts"][0], "*");
        assert!(json.get("status").is_none());
    }

    #[test]
    fn test_virtual_service_routes_through_gateway() {
        let vs = build_virtual_service();
        let gateway = build_gateway();

        assert_eq!(vs.metadata.name.as_deref(), Some("static-site"));
        assert_eq!(vs.spec.gateways, vec![gateway.metadata.name.unwrap()]);

        let route = &vs.spec.http[0].route[0];
        assert_eq!(route.destination.host, "static-site-service");
        assert_eq!(route.weight, Some(100));

        let json = serde_json::to_value(&vs).unwrap();
        assert!(json["spec"]["http"][0]["route"][0]["destination"]
            .get("subset")
            .is_none());
    }
}
