//! SQLite schema definition.

/// Complete database schema for the clinic KPI store.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Facilities
-- ============================================================================

CREATE TABLE IF NOT EXISTS cabins (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    cabin_number TEXT NOT NULL,
    name TEXT,
    bed_capacity INTEGER NOT NULL DEFAULT 1 CHECK (bed_capacity >= 1),
    active INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS wards (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ward_number TEXT NOT NULL,
    name TEXT,
    bed_capacity INTEGER NOT NULL DEFAULT 10 CHECK (bed_capacity >= 1),
    active INTEGER NOT NULL DEFAULT 1
);

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    is_admitted INTEGER NOT NULL DEFAULT 0,
    cabin_id INTEGER REFERENCES cabins(id),
    ward_id INTEGER REFERENCES wards(id),
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
);

CREATE INDEX IF NOT EXISTS idx_patients_created ON patients(created_at);
CREATE INDEX IF NOT EXISTS idx_patients_cabin ON patients(cabin_id);
CREATE INDEX IF NOT EXISTS idx_patients_ward ON patients(ward_id);

-- ============================================================================
-- Doctors & Appointments
-- ============================================================================

CREATE TABLE IF NOT EXISTS doctors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    specialization TEXT NOT NULL DEFAULT 'general',
    active INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS appointments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_id INTEGER NOT NULL REFERENCES patients(id),
    doctor_id INTEGER NOT NULL REFERENCES doctors(id),
    appointment_date TEXT NOT NULL,
    state TEXT NOT NULL DEFAULT 'draft'
        CHECK (state IN ('draft', 'confirmed', 'in_progress', 'done', 'cancelled')),
    total_amount REAL NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_appointments_date ON appointments(appointment_date);
CREATE INDEX IF NOT EXISTS idx_appointments_doctor ON appointments(doctor_id);

-- ============================================================================
-- Lab Tests
-- ============================================================================

CREATE TABLE IF NOT EXISTS lab_tests (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_id INTEGER NOT NULL REFERENCES patients(id),
    test_date TEXT NOT NULL,
    state TEXT NOT NULL DEFAULT 'draft'
        CHECK (state IN ('draft', 'sample_collected', 'in_progress', 'completed', 'cancelled')),
    test_cost REAL NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_lab_tests_date ON lab_tests(test_date);

-- ============================================================================
-- Staff: Employees, Attendance, Payroll
-- ============================================================================

CREATE TABLE IF NOT EXISTS employees (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    employee_type TEXT NOT NULL DEFAULT 'other',
    active INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS attendance (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    employee_id INTEGER NOT NULL REFERENCES employees(id),
    attendance_date TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'present'
        CHECK (status IN ('present', 'absent', 'half_day', 'late')),
    overtime_hours REAL NOT NULL DEFAULT 0,
    UNIQUE (employee_id, attendance_date)
);

CREATE INDEX IF NOT EXISTS idx_attendance_date ON attendance(attendance_date);

CREATE TABLE IF NOT EXISTS payrolls (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    employee_id INTEGER NOT NULL REFERENCES employees(id),
    payment_date TEXT NOT NULL,
    state TEXT NOT NULL DEFAULT 'draft'
        CHECK (state IN ('draft', 'confirmed', 'paid', 'cancelled')),
    net_salary REAL NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_payrolls_date ON payrolls(payment_date);

-- ============================================================================
-- KPI Snapshots (cached dashboard views, recomputed on refresh)
-- ============================================================================

CREATE TABLE IF NOT EXISTS kpi_snapshots (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    date_from TEXT NOT NULL,
    date_to TEXT NOT NULL,
    stats TEXT NOT NULL DEFAULT '{}',            -- JSON object of KpiStats
    is_default INTEGER NOT NULL DEFAULT 0,       -- the dashboard shown on first access
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now')),
    refreshed_at TEXT
);

-- At most one default dashboard
CREATE UNIQUE INDEX IF NOT EXISTS idx_kpi_snapshots_default
    ON kpi_snapshots(is_default) WHERE is_default = 1;
"#;
