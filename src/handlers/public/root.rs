// handlers/public/root.rs - GET / handler

use axum::response::Json;
use serde_json::{json, Value};

pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "endpoints": {
                "health": "/health (public)",
                "options": "/api/options/:type (public)",
                "auth": "/api/auth/login (public), /api/auth/logout, /api/auth/change-password",
                "users": "/api/users/me",
                "admins": "/api/admins/* (admin)",
                "managers": "/api/managers/* (admin; list also manager)",
                "teachers": "/api/teachers/* (admin, manager)",
                "schools": "/api/schools/* (admin, manager)"
            }
        }
    }))
}
