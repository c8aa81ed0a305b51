//! PowerShell template for `chocolateyInstall.ps1`.
//!
//! Rendered by Handlebars with HTML escaping disabled. Values interpolated
//! inside single-quoted PowerShell strings must already be quote-escaped.

pub const INSTALL_TEMPLATE: &str = r#"$ErrorActionPreference = 'Stop'

$installLocation = '{{install_location}}'

{{#if install_location}}
# Install location
try {
    New-Item -ItemType Directory -Force -Path $installLocation | Out-Null
    Write-Host "Created or verified install location: $installLocation"
} catch {
    Write-Error "Failed to create or access: $installLocation"
    exit 1
}
{{else}}
Write-Host 'No install location specified, skipping creation of directories.'
{{/if}}

{{#if has_payload}}
# Payload
$payloadPath = [System.IO.Path]::GetFullPath("$PSScriptRoot\..\payload").TrimEnd('\', '/')
if (Test-Path $payloadPath) {
    Write-Host "Payload path: $payloadPath"
    Get-ChildItem -Path $payloadPath -Recurse | Sort-Object { $_.FullName.Length } | ForEach-Object {
        $relativePath = $_.FullName.Substring($payloadPath.Length).TrimStart('\', '/')
        $destinationPath = Join-Path $installLocation $relativePath

        if ($_.PSIsContainer) {
            New-Item -ItemType Directory -Force -Path $destinationPath | Out-Null
            Write-Host "Created directory: $destinationPath"
        } else {
            $parent = Split-Path -Parent $destinationPath
            if (-not (Test-Path -Path $parent)) {
                New-Item -ItemType Directory -Force -Path $parent | Out-Null
            }
            Copy-Item -Path $_.FullName -Destination $destinationPath -Force
            if (-not (Test-Path -Path $destinationPath)) {
                Write-Error "Failed to copy: $($_.FullName)"
                exit 1
            }
            Write-Host "Copied: $($_.FullName) -> $destinationPath"
        }
    }
} else {
    Write-Host 'No payload folder found. Proceeding with script-only installation.'
}
{{else}}
Write-Host 'No payload folder found. Proceeding with script-only installation.'
{{/if}}

# Post-install action
{{post_install_action}}
"#;
