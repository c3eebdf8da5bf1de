pub mod appconfig;
