pub mod shadow_url;
