use crate::schema::{Area, DEVICE, Field, ResourceKind, ResourceSchema, VDOM};

const MAC_FILTER_LIST: &[Field] = &[
    Field::fosid(),
    Field::string("mac"),
    Field::string("mac_filter_policy"),
];

const OFFENDING_SSID: &[Field] = &[
    Field::fosid(),
    Field::string("ssid_pattern"),
    Field::set("action"),
];

pub(super) static SCHEMAS: &[ResourceSchema] = &[
    ResourceSchema {
        type_name: "fmgdevice_wirelesscontroller_setting",
        title: "WirelessControllerSetting",
        area: Area::WirelessController,
        description: "VDOM wireless controller configuration.",
        path: "/pm/config/device/{device}/vdom/{vdom}/wireless-controller/setting",
        kind: ResourceKind::Singleton,
        params: &[DEVICE, VDOM],
        fields: &[
            Field::string("account_id"),
            Field::string("country"),
            Field::string("duplicate_ssid"),
            Field::string("fapc_compatibility"),
            Field::string("wfa_compatibility"),
            Field::string("phishing_ssid_detect"),
            Field::set("fake_ssid_action"),
            Field::int("device_weight"),
            Field::int("device_holdoff"),
            Field::int("device_idle"),
            Field::string("firmware_provision_on_authorization"),
            Field::string("rolling_wtp_upgrade"),
            Field::int("darrp_optimize"),
            Field::list("darrp_optimize_schedules"),
            Field::block("offending_ssid", OFFENDING_SSID),
        ],
    },
    ResourceSchema {
        type_name: "fmgdevice_wirelesscontroller_vap",
        title: "WirelessControllerVap",
        area: Area::WirelessController,
        description: "Configure Virtual Access Points (VAPs).",
        path: "/pm/config/device/{device}/vdom/{vdom}/wireless-controller/vap",
        kind: ResourceKind::Table { mkey: "name" },
        params: &[DEVICE, VDOM],
        fields: &[
            Field::string("name").required().describe("Virtual AP name"),
            Field::string("ssid").describe("IEEE 802.11 service set identifier"),
            Field::string("security"),
            Field::string("passphrase").sensitive(),
            Field::string("encrypt"),
            Field::string("broadcast_ssid"),
            Field::list("schedule"),
            Field::int("max_clients"),
            Field::int("vlanid"),
            Field::string("intra_vap_privacy"),
            Field::string("local_bridging"),
            Field::string("mac_filter"),
            Field::string("mac_filter_policy_other"),
            Field::block("mac_filter_list", MAC_FILTER_LIST),
            Field::string("comment"),
        ],
    },
];
