use crate::schema::{Area, DEVICE, Field, ResourceKind, ResourceSchema, VDOM};

const FREE_STYLE: &[Field] = &[
    Field::fosid(),
    Field::string("category"),
    Field::string("filter"),
    Field::string("filter_type"),
];

const CUSTOM_FIELD_NAME: &[Field] = &[
    Field::fosid(),
    Field::string("name"),
    Field::string("custom"),
];

pub(super) static SCHEMAS: &[ResourceSchema] = &[
    ResourceSchema {
        type_name: "fmgdevice_log_syslogd_filter",
        title: "LogSyslogdFilter",
        area: Area::Log,
        description: "Filters for remote system server.",
        path: "/pm/config/device/{device}/vdom/{vdom}/log/syslogd/filter",
        kind: ResourceKind::Singleton,
        params: &[DEVICE, VDOM],
        fields: &[
            Field::string("severity").describe("Lowest severity level to log"),
            Field::string("forward_traffic"),
            Field::string("local_traffic"),
            Field::string("multicast_traffic"),
            Field::string("sniffer_traffic"),
            Field::string("ztna_traffic"),
            Field::string("http_transaction"),
            Field::string("anomaly"),
            Field::string("voip"),
            Field::string("gtp"),
            Field::string("forti_switch"),
            Field::string("debug"),
            Field::block("free_style", FREE_STYLE).describe("Free style filters"),
        ],
    },
    ResourceSchema {
        type_name: "fmgdevice_log_syslogd_setting",
        title: "LogSyslogdSetting",
        area: Area::Log,
        description: "Global settings for remote syslog server.",
        path: "/pm/config/device/{device}/global/log/syslogd/setting",
        kind: ResourceKind::Singleton,
        params: &[DEVICE],
        fields: &[
            Field::string("status"),
            Field::string("server").describe("Address of remote syslog server"),
            Field::string("mode"),
            Field::int("port"),
            Field::string("facility"),
            Field::string("source_ip"),
            Field::string("format"),
            Field::string("priority"),
            Field::int("max_log_rate"),
            Field::string("enc_algorithm"),
            Field::string("ssl_min_proto_version"),
            Field::list("certificate"),
            Field::string("interface_select_method"),
            Field::list("interface"),
            Field::int("vrf_select"),
            Field::block("custom_field_name", CUSTOM_FIELD_NAME),
        ],
    },
];
