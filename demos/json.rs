use allow_servlet::{ConstraintsBuilder, Result, Verdict};

fn main() -> Result<()> {
    let json = r#"{
        "denyUncoveredHttpMethods": true,
        "constraints": [
            {
                "description": "account management",
                "roles": ["customer", "support"],
                "sslRequired": true,
                "resourceCollections": [
                    {
                        "urlPatterns": ["/account/*"],
                        "httpMethods": ["GET", "POST"]
                    }
                ]
            },
            {
                "description": "internal tooling is never served",
                "accessPrecluded": true,
                "resourceCollections": [
                    {
                        "urlPatterns": ["/internal/*"]
                    }
                ]
            }
        ]
    }"#;

    // Construct the constraints.
    let constraints = ConstraintsBuilder::from_json(json).build()?;

    // Evaluate a few requests.
    for (path, method) in &[
        ("/account/profile", "GET"),
        ("/account/profile", "DELETE"),
        ("/account/profile", "PATCH"),
        ("/internal/metrics", "GET"),
        ("/index.html", "GET"),
    ] {
        match constraints.match_response(path, method).verdict() {
            Verdict::Unprotected { ssl_required } => {
                println!("{} {}: unprotected (ssl: {})", method, path, ssl_required)
            }
            Verdict::Challenge {
                roles,
                ssl_required,
            } => println!(
                "{} {}: requires one of {:?} (ssl: {})",
                method, path, roles, ssl_required
            ),
            Verdict::Denied(reason) => println!("{} {}: denied, {}", method, path, reason),
            Verdict::MethodNotAllowed => println!("{} {}: method not allowed", method, path),
        }
    }

    Ok(())
}
