use crate::schema::{Area, DEVICE, Field, ResourceKind, ResourceSchema};

const SNMP_HOSTS: &[Field] = &[
    Field::fosid(),
    Field::string("ip").describe("IPv4 address and netmask of the SNMP manager"),
    Field::string("source_ip"),
    Field::string("ha_direct"),
    Field::string("host_type"),
    Field::string("interface_select_method"),
    Field::list("interface"),
    Field::int("vrf_select"),
];

pub(super) static SCHEMAS: &[ResourceSchema] = &[
    ResourceSchema {
        type_name: "fmgdevice_system_dns",
        title: "SystemDns",
        area: Area::System,
        description: "Configure DNS.",
        path: "/pm/config/device/{device}/global/system/dns",
        kind: ResourceKind::Singleton,
        params: &[DEVICE],
        fields: &[
            Field::string("primary").describe("Primary DNS server IP address"),
            Field::string("secondary").describe("Secondary DNS server IP address"),
            Field::string("alt_primary"),
            Field::string("alt_secondary"),
            Field::set("protocol").describe("DNS transport protocols"),
            Field::string("ssl_certificate"),
            Field::list("server_hostname"),
            Field::set("domain").describe("Search suffix list for hostname lookup"),
            Field::string("ip6_primary"),
            Field::string("ip6_secondary"),
            Field::int("timeout"),
            Field::int("retry"),
            Field::int("dns_cache_limit"),
            Field::int("dns_cache_ttl"),
            Field::string("cache_notfound_responses"),
            Field::string("source_ip"),
            Field::string("interface_select_method"),
            Field::list("interface"),
            Field::int("vrf_select"),
            Field::string("server_select_method"),
            Field::set("log"),
            Field::int("fqdn_cache_ttl"),
            Field::int("fqdn_min_refresh"),
        ],
    },
    ResourceSchema {
        type_name: "fmgdevice_system_dpdk_cpus",
        title: "SystemDpdkCpus",
        area: Area::System,
        description: "Configure CPUs enabled to run engines in each DPDK stage.",
        path: "/pm/config/device/{device}/global/system/dpdk/cpus",
        kind: ResourceKind::Singleton,
        params: &[DEVICE],
        fields: &[
            Field::string("rx_cpus").describe("CPUs enabled to run DPDK RX engines"),
            Field::string("vnp_cpus").describe("CPUs enabled to run DPDK VNP engines"),
            Field::string("ips_cpus").describe("CPUs enabled to run DPDK IPS engines"),
            Field::string("tx_cpus").describe("CPUs enabled to run DPDK TX engines"),
            Field::string("isolated_cpus"),
        ],
    },
    ResourceSchema {
        type_name: "fmgdevice_system_ntp_ntpserver",
        title: "SystemNtpNtpserver",
        area: Area::System,
        description: "Configure the FortiGate to connect to any available third-party NTP server.",
        path: "/pm/config/device/{device}/global/system/ntp/ntpserver",
        kind: ResourceKind::Table { mkey: "fosid" },
        params: &[DEVICE],
        fields: &[
            Field::fosid().required().describe("NTP server ID"),
            Field::string("server").describe("IP address or hostname of the NTP server"),
            Field::string("ntpv3"),
            Field::string("authentication"),
            Field::string("key").sensitive(),
            Field::int("key_id"),
            Field::string("key_type"),
            Field::string("ip_type"),
            Field::string("interface_select_method"),
            Field::list("interface"),
            Field::int("vrf_select"),
        ],
    },
    ResourceSchema {
        type_name: "fmgdevice_system_snmp_community",
        title: "SystemSnmpCommunity",
        area: Area::System,
        description: "SNMP community configuration.",
        path: "/pm/config/device/{device}/global/system/snmp/community",
        kind: ResourceKind::Table { mkey: "fosid" },
        params: &[DEVICE],
        fields: &[
            Field::fosid().required().describe("Community ID"),
            Field::string("name").required().describe("Community name"),
            Field::string("status"),
            Field::string("query_v1_status"),
            Field::int("query_v1_port"),
            Field::string("query_v2c_status"),
            Field::int("query_v2c_port"),
            Field::string("trap_v1_status"),
            Field::string("trap_v2c_status"),
            Field::set("events"),
            Field::list("vdoms"),
            Field::string("mib_view"),
            Field::block("hosts", SNMP_HOSTS).describe("Configure IPv4 SNMP managers"),
        ],
    },
];
