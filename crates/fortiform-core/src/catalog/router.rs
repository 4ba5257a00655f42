use crate::schema::{Area, DEVICE, Field, Param, ResourceKind, ResourceSchema, VDOM};

const OSPF_INTERFACE: Param =
    Param::new("ospf_interface", "ospf_interface").describe("Parent OSPF interface name");

const ACCESS_LIST: Param =
    Param::new("access_list", "access_list").describe("Parent access list name");

const PREFIX_RULES: &[Field] = &[
    Field::fosid(),
    Field::string("action"),
    Field::string("prefix"),
    Field::string("ge"),
    Field::string("le"),
    Field::int("flags"),
];

pub(super) static SCHEMAS: &[ResourceSchema] = &[
    ResourceSchema {
        type_name: "fmgdevice_router_accesslist_rule",
        title: "RouterAccessListRule",
        area: Area::Router,
        description: "Rule.",
        path: "/pm/config/device/{device}/vdom/{vdom}/router/access-list/{access_list}/rule",
        kind: ResourceKind::Table { mkey: "fosid" },
        params: &[DEVICE, VDOM, ACCESS_LIST],
        fields: &[
            Field::fosid().required().describe("Rule ID"),
            Field::string("action").describe("Permit or deny this IP address and netmask prefix"),
            Field::string("prefix"),
            Field::string("wildcard"),
            Field::string("exact_match"),
            Field::int("flags"),
        ],
    },
    ResourceSchema {
        type_name: "fmgdevice_router_ospf_ospfinterface_md5keys",
        title: "RouterOspfOspfInterfaceMd5Keys",
        area: Area::Router,
        description: "MD5 key.",
        path: "/pm/config/device/{device}/vdom/{vdom}/router/ospf/ospf-interface/{ospf_interface}/md5-keys",
        kind: ResourceKind::Table { mkey: "fosid" },
        params: &[DEVICE, VDOM, OSPF_INTERFACE],
        fields: &[
            Field::fosid().required().describe("Key ID (1 - 255)"),
            Field::string("key_string")
                .required()
                .sensitive()
                .describe("Password for the key"),
        ],
    },
    ResourceSchema {
        type_name: "fmgdevice_router_prefixlist",
        title: "RouterPrefixList",
        area: Area::Router,
        description: "Configure IPv4 prefix lists.",
        path: "/pm/config/device/{device}/vdom/{vdom}/router/prefix-list",
        kind: ResourceKind::Table { mkey: "name" },
        params: &[DEVICE, VDOM],
        fields: &[
            Field::string("name").required().describe("Name"),
            Field::string("comments"),
            Field::block("rule", PREFIX_RULES).describe("IPv4 prefix list rule"),
        ],
    },
    ResourceSchema {
        type_name: "fmgdevice_router_static",
        title: "RouterStatic",
        area: Area::Router,
        description: "Configure IPv4 static routing tables.",
        path: "/pm/config/device/{device}/vdom/{vdom}/router/static",
        kind: ResourceKind::Table { mkey: "seq_num" },
        params: &[DEVICE, VDOM],
        fields: &[
            Field::int("seq_num").required().describe("Sequence number"),
            Field::string("status"),
            Field::list("dst").describe("Destination IP and mask for this route"),
            Field::string("gateway"),
            Field::int("distance"),
            Field::int("weight"),
            Field::int("priority"),
            Field::list("device").describe("Gateway out interface or tunnel"),
            Field::string("comment"),
            Field::string("blackhole"),
            Field::string("dynamic_gateway"),
            Field::list("dstaddr"),
            Field::list("sdwan_zone"),
            Field::string("link_monitor_exempt"),
            Field::int("vrf"),
            Field::string("bfd"),
        ],
    },
];
