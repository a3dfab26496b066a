//! OpenAPI 3.1 document for the proxy surface.
//!
//! Served verbatim at `GET /openapi.json`. Schemas describe the sanitized
//! shapes only; sensitive upstream fields (PAN, CVV, expiry) do not exist
//! in this contract.

use serde_json::{json, Value};

/// Build the OpenAPI document.
pub fn document() -> Value {
    json!({
        "openapi": "3.1.0",
        "info": {
            "title": "card-proxy",
            "version": "1.0.0",
            "description": "A read-only proxy for a card-issuing API. Exposes virtual card and transaction data with sensitive fields (PAN, CVV, expiry) stripped."
        },
        "security": [{"bearerAuth": []}, {"tokenQueryParam": []}],
        "components": {
            "securitySchemes": {
                "bearerAuth": {
                    "type": "http",
                    "scheme": "bearer",
                    "description": "Pass the configured read-only bearer token."
                },
                "tokenQueryParam": {
                    "type": "apiKey",
                    "in": "query",
                    "name": "token",
                    "description": "Pass the configured read-only bearer token as a ?token= query parameter."
                }
            },
            "schemas": {
                "ErrorResponse": {
                    "type": "object",
                    "properties": {
                        "error": {
                            "type": "object",
                            "properties": {
                                "code": {"type": "string"},
                                "message": {"type": "string"}
                            },
                            "required": ["code", "message"]
                        }
                    },
                    "required": ["error"]
                },
                "FundingSource": {
                    "type": "object",
                    "properties": {
                        "token": {"type": "string", "format": "uuid"},
                        "created": {"type": "string", "format": "date-time"},
                        "type": {"type": "string"},
                        "state": {"type": "string"},
                        "nickname": {"type": "string"},
                        "account_name": {"type": "string"},
                        "last_four": {"type": "string"}
                    }
                },
                "Card": {
                    "type": "object",
                    "description": "Virtual card with sensitive fields (PAN, CVV, expiry) stripped.",
                    "properties": {
                        "token": {"type": "string", "format": "uuid"},
                        "created": {"type": "string", "format": "date-time"},
                        "last_four": {"type": "string"},
                        "hostname": {"type": "string"},
                        "memo": {"type": "string"},
                        "type": {
                            "type": "string",
                            "enum": ["SINGLE_USE", "MERCHANT_LOCKED", "UNLOCKED", "PHYSICAL"]
                        },
                        "spend_limit": {
                            "type": "integer",
                            "description": "Spend limit in cents. 0 means no limit."
                        },
                        "spend_limit_duration": {
                            "type": "string",
                            "enum": ["TRANSACTION", "MONTHLY", "ANNUALLY", "FOREVER"]
                        },
                        "state": {"type": "string", "enum": ["OPEN", "PAUSED", "CLOSED"]},
                        "funding": {"$ref": "#/components/schemas/FundingSource"},
                        "auth_rule_tokens": {"type": "array", "items": {"type": "string"}}
                    }
                },
                "CardListResponse": {
                    "type": "object",
                    "properties": {
                        "data": {"type": "array", "items": {"$ref": "#/components/schemas/Card"}},
                        "has_more": {"type": "boolean"}
                    }
                },
                "Merchant": {
                    "type": "object",
                    "properties": {
                        "acceptor_id": {"type": "string"},
                        "city": {"type": "string"},
                        "country": {"type": "string"},
                        "descriptor": {"type": "string"},
                        "mcc": {"type": "string"},
                        "state": {"type": "string"}
                    }
                },
                "TransactionEvent": {
                    "type": "object",
                    "properties": {
                        "amount": {"type": "integer"},
                        "created": {"type": "string", "format": "date-time"},
                        "result": {"type": "string"},
                        "type": {"type": "string"},
                        "token": {"type": "string", "format": "uuid"}
                    }
                },
                "FundingEntry": {
                    "type": "object",
                    "properties": {
                        "amount": {"type": "integer"},
                        "token": {"type": "string", "format": "uuid"},
                        "type": {"type": "string"}
                    }
                },
                "Transaction": {
                    "type": "object",
                    "properties": {
                        "amount": {"type": "integer"},
                        "authorization_amount": {"type": "integer"},
                        "card_token": {"type": "string", "format": "uuid"},
                        "merchant_amount": {"type": "integer"},
                        "merchant_authorization_amount": {"type": "integer"},
                        "merchant_currency": {"type": "string"},
                        "acquirer_fee": {"type": "integer"},
                        "created": {"type": "string", "format": "date-time"},
                        "events": {"type": "array", "items": {"$ref": "#/components/schemas/TransactionEvent"}},
                        "funding": {"type": "array", "items": {"$ref": "#/components/schemas/FundingEntry"}},
                        "merchant": {"$ref": "#/components/schemas/Merchant"},
                        "result": {"type": "string", "enum": ["APPROVED", "DECLINED"]},
                        "settled_amount": {"type": "integer"},
                        "status": {"type": "string"},
                        "token": {"type": "string", "format": "uuid"},
                        "authorization_code": {"type": "string"}
                    }
                },
                "TransactionListResponse": {
                    "type": "object",
                    "properties": {
                        "data": {"type": "array", "items": {"$ref": "#/components/schemas/Transaction"}},
                        "has_more": {"type": "boolean"}
                    }
                }
            },
            "parameters": {
                "AccountToken": {
                    "name": "account_token",
                    "in": "query",
                    "schema": {"type": "string", "format": "uuid"}
                },
                "Begin": {
                    "name": "begin",
                    "in": "query",
                    "schema": {"type": "string", "format": "date"}
                },
                "End": {
                    "name": "end",
                    "in": "query",
                    "schema": {"type": "string", "format": "date"}
                },
                "PageSize": {
                    "name": "page_size",
                    "in": "query",
                    "schema": {"type": "integer", "minimum": 1, "maximum": 1000}
                },
                "StartingAfter": {
                    "name": "starting_after",
                    "in": "query",
                    "schema": {"type": "string", "format": "uuid"}
                }
            }
        },
        "paths": {
            "/healthz": {
                "get": {
                    "summary": "Health check",
                    "security": [],
                    "responses": {
                        "200": {"description": "Service is healthy"}
                    }
                }
            },
            "/cards": {
                "get": {
                    "summary": "List cards",
                    "parameters": [
                        {"$ref": "#/components/parameters/AccountToken"},
                        {"$ref": "#/components/parameters/Begin"},
                        {"$ref": "#/components/parameters/End"},
                        {"$ref": "#/components/parameters/PageSize"},
                        {"$ref": "#/components/parameters/StartingAfter"}
                    ],
                    "responses": {
                        "200": {
                            "description": "Sanitized card list",
                            "content": {"application/json": {"schema": {"$ref": "#/components/schemas/CardListResponse"}}}
                        },
                        "400": {
                            "description": "Invalid query parameter",
                            "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ErrorResponse"}}}
                        },
                        "401": {
                            "description": "Missing or invalid bearer token",
                            "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ErrorResponse"}}}
                        }
                    }
                }
            },
            "/cards/{token}": {
                "get": {
                    "summary": "Get one card",
                    "parameters": [
                        {
                            "name": "token",
                            "in": "path",
                            "required": true,
                            "schema": {"type": "string", "format": "uuid"}
                        }
                    ],
                    "responses": {
                        "200": {
                            "description": "Sanitized card",
                            "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Card"}}}
                        },
                        "400": {
                            "description": "Invalid card token",
                            "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ErrorResponse"}}}
                        }
                    }
                }
            },
            "/transactions": {
                "get": {
                    "summary": "List transactions",
                    "parameters": [
                        {"$ref": "#/components/parameters/AccountToken"},
                        {
                            "name": "card_token",
                            "in": "query",
                            "schema": {"type": "string", "format": "uuid"}
                        },
                        {
                            "name": "result",
                            "in": "query",
                            "schema": {"type": "string", "enum": ["APPROVED", "DECLINED"]}
                        },
                        {"$ref": "#/components/parameters/Begin"},
                        {"$ref": "#/components/parameters/End"},
                        {"$ref": "#/components/parameters/PageSize"},
                        {"$ref": "#/components/parameters/StartingAfter"}
                    ],
                    "responses": {
                        "200": {
                            "description": "Sanitized transaction list",
                            "content": {"application/json": {"schema": {"$ref": "#/components/schemas/TransactionListResponse"}}}
                        },
                        "400": {
                            "description": "Invalid query parameter",
                            "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ErrorResponse"}}}
                        }
                    }
                }
            },
            "/transactions/{token}": {
                "get": {
                    "summary": "Get one transaction (disabled by default)",
                    "parameters": [
                        {
                            "name": "token",
                            "in": "path",
                            "required": true,
                            "schema": {"type": "string", "format": "uuid"}
                        }
                    ],
                    "responses": {
                        "200": {
                            "description": "Sanitized transaction",
                            "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Transaction"}}}
                        },
                        "501": {
                            "description": "Route disabled",
                            "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ErrorResponse"}}}
                        }
                    }
                }
            }
        }
    })
}
