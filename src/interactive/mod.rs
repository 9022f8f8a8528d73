//
//  cdek-client
//  interactive/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Terminal prompts used by `cdek auth login` when credentials are not given
//! as flags.

mod prompt;

pub use prompt::*;
