pub mod shared {
    pub mod core {
        pub mod primitives;
    }
    pub mod infrastructure {
        pub mod record_store;
    }
}

pub mod modules {
    pub mod students {
        pub mod core {
            pub mod access_keys;
            pub mod company_key;
            pub mod projections;
            pub mod student;
            pub mod validation;
        }
        pub mod use_cases {
            pub mod errors;
            pub mod create_student {
                pub mod command;
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod update_student {
                pub mod command;
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod delete_student {
                pub mod command;
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod ensure_sections {
                pub mod command;
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod repair_projections {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod projections;
            }
        }
    }

    pub mod evaluations {
        pub mod core {
            pub mod matching;
            pub mod metrics;
            pub mod reduce;
            pub mod state;
            pub mod submission;
        }
        pub mod use_cases {
            pub mod reconcile_evaluations {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod status_store;
            }
        }
    }

    pub mod reports {
        pub mod core {
            pub mod institution;
            pub mod report;
        }
        pub mod use_cases {
            pub mod export_report {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod xlsx;
            }
        }
    }
}

pub mod shell;
